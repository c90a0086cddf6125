use workload_resolver::core::WorkloadError;
use workload_resolver::resolver::resolve_workload;
use workload_resolver::workload::WorkloadBuilder;

use crate::common::shop;

#[test]
fn test_components_in_dependency_order() {
    let (_fixture, config) = shop();

    let workload = resolve_workload(&config).unwrap();
    let collection = workload.as_collection().unwrap();

    let names: Vec<_> = collection.components.iter().map(|c| c.shared.name.as_str()).collect();
    assert_eq!(names, vec!["db", "web"]);
    assert!(collection.components.iter().all(|c| c.collection.as_deref() == Some("shop")));
}

#[test]
fn test_collection_fields_merged_once() {
    let (_fixture, config) = shop();

    let workload = resolve_workload(&config).unwrap();
    let fields = workload.api_spec_fields();

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field_name, "namespace");
    assert_eq!(fields[0].declared_in, "ns.yaml:4");
    assert_eq!(fields[0].documentation_lines, vec!["Namespace for every component"]);

    let collection = workload.as_collection().unwrap();
    let web = collection.component("web").unwrap();
    assert_eq!(web.api_spec_fields[0].field_name, "replicas");
    assert!(
        web.source_files[0].children[0]
            .source_code
            .contains("namespace: !!start collection.Spec.Namespace !!end")
    );
}

#[test]
fn test_component_source_files() {
    let (_fixture, config) = shop();

    let workload = resolve_workload(&config).unwrap();
    let db = workload.as_collection().unwrap().component("db").unwrap();

    assert_eq!(db.source_files.len(), 1);
    assert_eq!(db.source_files[0].filename, "db.go");
    assert!(db.source_files[0].has_static);
    assert_eq!(db.create_func_names, vec!["CreateStatefulSetDb", "CreateServiceDb"]);
}

#[test]
fn test_names_cascade_to_components() {
    let (_fixture, config) = shop();

    let workload = resolve_workload(&config).unwrap();
    assert_eq!(workload.package_name(), "shop");

    let names: Vec<_> = workload.subcommands().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["collection", "db", "web"]);

    let collection = workload.as_collection().unwrap();
    assert_eq!(collection.root_command.name, "shopctl");
    assert_eq!(collection.root_command.description, "Manage shop collection and components");
    assert_eq!(collection.component("web").unwrap().sub_command.description, "Manage web workload");
}

#[test]
fn test_rbac_lines_in_component_order() {
    let (_fixture, config) = shop();

    let lines = resolve_workload(&config).unwrap().rbac_marker_lines();
    let resources: Vec<_> = lines
        .iter()
        .map(|line| {
            line.split(',')
                .find_map(|part| part.strip_prefix("resources="))
                .unwrap()
        })
        .collect();

    assert_eq!(
        resources,
        vec![
            "shops",
            "shops/status",
            "namespaces",
            "dbs",
            "dbs/status",
            "statefulsets",
            "services",
            "webs",
            "webs/status",
            "deployments",
        ]
    );
}

#[test]
fn test_dependency_cycle_names_both_components() {
    let (fixture, config) = shop();
    fixture.component("components/db/workload.yaml", "db", &["db.yaml"], &["web"]);

    let error = resolve_workload(&config).unwrap_err();
    match error.downcast_ref::<WorkloadError>() {
        Some(WorkloadError::DependencyCycle { chain }) => {
            assert!(chain.contains(&"web".to_string()));
            assert!(chain.contains(&"db".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_collection_marker_rejected_in_standalone() {
    let (fixture, _) = shop();
    let config = fixture.standalone("web", &["components/web/deploy.yaml"]);

    let error = resolve_workload(&config).unwrap_err();
    match error.downcast_ref::<WorkloadError>() {
        Some(WorkloadError::MarkerParse { file, line, .. }) => {
            assert_eq!(file, "components/web/deploy.yaml");
            assert_eq!(*line, 5);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
