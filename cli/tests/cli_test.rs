mod data;
use assert_cmd::Command;

#[test]
fn render_instance() {
    let mut cmd = Command::cargo_bin("backstage-render").unwrap();
    cmd.env_remove("RELATED_IMAGE_backstage");
    cmd.args(&[
        "render",
        "--instance",
        data::backstage_path().to_str().unwrap(),
        "--deployment",
        data::deployment_path().to_str().unwrap(),
        "--external",
        data::external_path().to_str().unwrap(),
        "--default-config",
        data::default_config_path().to_str().unwrap(),
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let yaml = String::from_utf8(output).unwrap();

    assert!(yaml.contains("name: backstage-dynamic-plugins-my-backstage"));
    assert!(yaml.contains("mountPath: /opt/app-root/src/dynamic-plugins.yaml"));
    assert!(yaml.contains("claimName: backstage-my-backstage-data"));
    assert!(yaml.contains("mountPath: /opt/app/data"));
    assert!(yaml.contains("mountPath: /opt/extra-files/cache"));
    assert!(yaml.contains("mountPath: /tmp/scratch"));
    assert!(!yaml.contains("not-there"));
}

#[test]
fn render_without_init_container_fails() {
    let dir = tempfile::tempdir().unwrap();
    let deployment = dir.path().join("deployment.yaml");
    let content = std::fs::read_to_string(data::deployment_path()).unwrap();
    std::fs::write(
        &deployment,
        content.replace("install-dynamic-plugins", "some-other-init"),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("backstage-render").unwrap();
    cmd.args(&[
        "render",
        "--instance",
        data::backstage_path().to_str().unwrap(),
        "--deployment",
        deployment.to_str().unwrap(),
        "--external",
        data::external_path().to_str().unwrap(),
    ]);
    let output = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8(output).unwrap();
    assert!(stderr.contains("install-dynamic-plugins"));
}

#[test]
fn print_crd() {
    let mut cmd = Command::cargo_bin("backstage-render").unwrap();
    cmd.arg("crd");
    let output = cmd.assert().success().get_output().stdout.clone();
    let yaml = String::from_utf8(output).unwrap();
    assert!(yaml.contains("kind: CustomResourceDefinition"));
    assert!(yaml.contains("backstages.rhdh.redhat.com"));
}
