use workload_resolver::resolver::resolve_workload;
use workload_resolver::test_utils::fixtures::manifests;
use workload_resolver::workload::{FieldType, Workload, WorkloadBuilder};

use crate::common::webstore;

#[test]
fn test_resolve_standalone_workload() {
    let (_fixture, config) = webstore();

    let workload = resolve_workload(&config).unwrap();
    let Workload::Standalone(standalone) = &workload else {
        panic!("expected a standalone workload");
    };

    assert_eq!(standalone.shared.package_name, "webstore");
    assert_eq!(standalone.api.kind, "Webstore");

    let files: Vec<_> = workload.source_files().iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(files, vec!["app.go", "svc.go"]);
    assert!(!workload.source_files()[0].has_static);
    assert!(workload.source_files()[1].has_static);

    let replicas = &workload.api_spec_fields()[0];
    assert_eq!(replicas.field_name, "webStoreReplicas");
    assert_eq!(replicas.field_type, FieldType::Int);
    assert_eq!(replicas.default_value.as_deref(), Some("2"));
    assert_eq!(replicas.declared_in, "manifests/app.yaml:6");

    let deployment = &workload.source_files()[0].children[0];
    assert!(deployment.source_code.contains("replicas: !!start parent.Spec.WebStoreReplicas !!end"));
    assert!(deployment.source_code.contains("image: !!start parent.Spec.WebStoreImage !!end"));
    assert!(!deployment.source_code.contains("+operator-builder"));
}

#[test]
fn test_rbac_lines_own_resource_first() {
    let (_fixture, config) = webstore();

    let lines = resolve_workload(&config).unwrap().rbac_marker_lines();
    assert_eq!(
        lines,
        vec![
            "+kubebuilder:rbac:groups=apps.acme.com,resources=webstores,verbs=get;list;watch;create;update;patch;delete",
            "+kubebuilder:rbac:groups=apps.acme.com,resources=webstores/status,verbs=get;update;patch",
            "+kubebuilder:rbac:groups=apps,resources=deployments,verbs=get;list;watch;create;update;patch;delete",
            "+kubebuilder:rbac:groups=core,resources=services,verbs=get;list;watch;create;update;patch;delete",
        ]
    );
}

#[test]
fn test_duplicate_children_collapse_into_one_rule() {
    let (fixture, _) = webstore();
    fixture.write("manifests/other.yaml", manifests::DEPLOYMENT);
    let config = fixture.standalone("webstore", &["manifests/app.yaml", "manifests/other.yaml"]);

    let workload = resolve_workload(&config).unwrap();
    let deployments = workload
        .rbac_marker_lines()
        .into_iter()
        .filter(|line| line.contains("resources=deployments,"))
        .count();
    assert_eq!(deployments, 1);

    let (create, _) = workload.func_names();
    assert_eq!(create, vec!["CreateDeploymentWebstoreDeploy", "CreateDeploymentWebstoreDeploy2"]);
}

#[test]
fn test_crd_constructors_run_at_init() {
    let (fixture, _) = webstore();
    fixture.write(
        "crd.yaml",
        "apiVersion: apiextensions.k8s.io/v1\nkind: CustomResourceDefinition\nmetadata:\n  name: widgets.acme.com\n",
    );
    let config = fixture.standalone("webstore", &["crd.yaml"]);

    let workload = resolve_workload(&config).unwrap();
    let (create, init) = workload.func_names();
    assert_eq!(create, init);
    assert!(workload.source_files()[0].children[0].cluster_scoped);
}

#[test]
fn test_role_grants_become_rules() {
    let (fixture, _) = webstore();
    fixture.write("role.yaml", manifests::ROLE);
    let config = fixture.standalone("webstore", &["role.yaml"]);

    let lines = resolve_workload(&config).unwrap().rbac_marker_lines();
    assert!(lines.contains(
        &"+kubebuilder:rbac:groups=rbac.authorization.k8s.io,resources=roles,verbs=get;list;watch;create;update;patch;delete"
            .to_string()
    ));
    assert!(lines.contains(&"+kubebuilder:rbac:groups=core,resources=pods,verbs=get;list;watch".to_string()));
}
