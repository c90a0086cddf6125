#[cfg(test)]
mod tests {
    use crate::core::{FileOperation, FileOperationError, WorkloadError};
    use crate::test_utils::{WorkloadFixture, fixtures::manifests};
    use crate::workload::{APISpec, CliCommand, ComponentWorkload, StandaloneWorkload, WorkloadBuilder, WorkloadKind};

    fn api() -> APISpec {
        APISpec {
            domain: "acme.com".to_string(),
            group: "apps".to_string(),
            version: "v1alpha1".to_string(),
            kind: "StandaloneWorkloadTest".to_string(),
            cluster_scoped: false,
        }
    }

    #[test]
    fn test_set_names_without_root_command() {
        let mut workload = StandaloneWorkload::new("shared-name", api(), "workload.yaml");
        workload.set_names();

        assert_eq!(workload.package_name(), "sharedname");
        assert_eq!(workload.root_command, CliCommand::default());
        assert!(!workload.has_root_cmd_name());
    }

    #[test]
    fn test_set_names_with_root_command() {
        let mut workload = StandaloneWorkload::new("has-root-command", api(), "workload.yaml");
        workload.root_command = CliCommand::named("hasrootcommand");
        workload.set_names();

        assert_eq!(workload.package_name(), "hasrootcommand");
        assert_eq!(workload.root_command.description, "Manage standaloneworkloadtest workload");
        assert_eq!(workload.root_command.var_name, "Hasrootcommand");
        assert_eq!(workload.root_command.file_name, "hasrootcommand");
    }

    #[test]
    fn test_set_names_keeps_custom_description() {
        let mut workload = StandaloneWorkload::new("webstore", api(), "workload.yaml");
        workload.root_command = CliCommand {
            name: "webstorectl".to_string(),
            description: "Manage webstore application".to_string(),
            ..CliCommand::default()
        };
        workload.set_names();

        assert_eq!(workload.root_command.description, "Manage webstore application");
        assert_eq!(workload.root_command.var_name, "Webstorectl");
    }

    #[test]
    fn test_set_names_is_idempotent() {
        let mut workload = StandaloneWorkload::new("web-store", api(), "workload.yaml");
        workload.root_command = CliCommand::named("web-store");
        workload.set_names();
        let first = workload.clone();
        workload.set_names();

        assert_eq!(workload, first);
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let workload = StandaloneWorkload::new(
            "webstore",
            APISpec {
                domain: "acme.com".to_string(),
                ..APISpec::default()
            },
            "workload.yaml",
        );

        match workload.validate().unwrap_err() {
            WorkloadError::Validation { workload, missing } => {
                assert_eq!(workload, "webstore");
                assert_eq!(missing, vec!["spec.api.group", "spec.api.version", "spec.api.kind"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_has_child_resources_before_set_resources() {
        let mut workload = StandaloneWorkload::new("webstore", api(), "workload.yaml");
        assert!(!workload.has_child_resources());

        workload.resources = vec!["app.yaml".to_string()];
        assert!(workload.has_child_resources());
    }

    #[test]
    fn test_set_components_not_allowed() {
        let mut workload = StandaloneWorkload::new("webstore", api(), "workload.yaml");
        let component = ComponentWorkload::new("db", api(), "db.yaml");

        let error = workload.set_components(vec![component]).unwrap_err();
        assert!(matches!(
            error,
            WorkloadError::UnsupportedOperation {
                variant: WorkloadKind::Standalone,
                ..
            }
        ));
        assert!(workload.components().is_empty());
    }

    #[test]
    fn test_set_resources() {
        let fixture = WorkloadFixture::new();
        fixture.write("app.yaml", manifests::DEPLOYMENT);
        fixture.write("svc.yaml", manifests::SERVICE);
        let config = fixture.standalone("webstore", &["app.yaml", "svc.yaml"]);

        let mut workload = StandaloneWorkload::new("webstore", api(), &config);
        workload.resources = vec!["app.yaml".to_string(), "svc.yaml".to_string()];
        workload.set_resources(&config).unwrap();

        let names: Vec<_> = workload.api_spec_fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["webStoreReplicas", "webStoreImage"]);
        assert_eq!(
            workload.api_spec_fields[1].documentation_lines,
            vec!["Defines the web store image.", "Must include a tag."]
        );

        assert_eq!(workload.source_files.len(), 2);
        assert_eq!(workload.source_files[0].filename, "app.go");
        assert!(workload.has_child_resources());
        assert_eq!(
            workload.create_func_names,
            vec!["CreateDeploymentWebstoreDeploy", "CreateServiceWebstoreSvc"]
        );
        assert!(workload.init_func_names.is_empty());

        let lines = workload.rbac_rules.marker_lines();
        assert_eq!(
            lines[0],
            "+kubebuilder:rbac:groups=apps.acme.com,resources=standaloneworkloadtests,verbs=get;list;watch;create;update;patch;delete"
        );
        assert_eq!(
            lines[1],
            "+kubebuilder:rbac:groups=apps.acme.com,resources=standaloneworkloadtests/status,verbs=get;update;patch"
        );
        assert_eq!(workload.ownership_rules.len(), 2);
    }

    #[test]
    fn test_set_resources_missing_manifest() {
        let fixture = WorkloadFixture::new();
        let config = fixture.standalone("webstore", &["missing.yaml"]);

        let mut workload = StandaloneWorkload::new("webstore", api(), &config);
        workload.resources = vec!["missing.yaml".to_string()];
        let error = workload.set_resources(&config).unwrap_err();

        let file_error = error.downcast_ref::<FileOperationError>().unwrap();
        assert_eq!(file_error.operation, FileOperation::Read);
        assert!(file_error.file_path.ends_with("missing.yaml"));
    }
}
