//! Basic checks of the NGINX image itself.
//!
//! Needs podman or docker, s2i, and IMAGE_NAME / VERSION / TARGET:
//!   cargo test --features container-tests --test container_basics
#![cfg(feature = "container-tests")]

mod common;

use common::suite::Suite;
use common::{example_dockerfile, test_dir};
use nginx_container_tests::container::BuildRequest;
use nginx_container_tests::dockerfile::{DockerfileEditor, SubstitutionRule};
use nginx_container_tests::engine::ContainerEngine;
use nginx_container_tests::matching::starts_with_version;
use nginx_container_tests::probe::Probe;
use serial_test::serial;
use std::fs;

#[test]
#[serial]
fn test_s2i_usage() {
    let suite = Suite::load();
    let orch = suite.orchestrator();

    let usage = orch.s2i_usage(&suite.config.image_name).unwrap();
    assert!(!usage.trim().is_empty(), "s2i usage printed nothing");
}

#[test]
#[serial]
fn test_docker_run_usage() {
    let suite = Suite::load();
    let orch = suite.orchestrator();

    assert!(orch.engine().run_rm(&suite.config.image_name, None).is_ok());
}

#[test]
#[serial]
fn test_scl_usage() {
    let suite = Suite::load();
    let orch = suite.orchestrator();

    let output = orch
        .run_command(&suite.config.image_name, "nginx -v 2>&1")
        .unwrap();
    assert!(
        starts_with_version(&output, &suite.config.version),
        "unexpected nginx -v output: {}",
        output
    );
}

#[test]
#[serial]
fn test_dockerfiles() {
    let suite = Suite::load();
    let version = suite.config.dockerfile_version().to_string();

    for name in ["Dockerfile", "Dockerfile.s2i"] {
        let mut orch = suite.orchestrator();

        let mut editor = DockerfileEditor::open(example_dockerfile(name)).unwrap();
        editor.apply(&SubstitutionRule::nginx_version(&version));
        let dockerfile = editor.create_temp_dockerfile().unwrap();

        let dest = suite.config.app_image_name(&name.to_lowercase().replace('.', "-"));
        let request = BuildRequest::dockerfile(&dockerfile, &test_dir(), &dest)
            .with_app_name(name)
            .with_args(vec![
                "--build-arg".to_string(),
                format!("BASE_IMAGE={}", suite.config.image_name),
            ]);
        let built = orch.build_image(&request);
        let _ = fs::remove_file(&dockerfile);
        let mut handle = built.unwrap_or_else(|e| panic!("{} failed to build: {}", name, e));

        assert!(orch.create_container(&mut handle, "dockerfile", &[]));
        let cip = orch.handle_ip(&mut handle).unwrap();
        assert!(!cip.is_empty());

        let prober = suite.prober();
        assert!(prober.probe(
            &Probe::new(&cip)
                .port(suite.port())
                .expect_code(200)
                .expect_output("NGINX is working")
        ));
        // orchestrator drop removes the container and the image
    }
}
