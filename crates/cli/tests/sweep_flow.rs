#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

fn write_stub(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Stubs plus input fixtures for one sweep invocation.
struct Fixture {
    temp: tempfile::TempDir,
    support_tool: PathBuf,
    inspect_tool: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        // Plain tar archive holding the serialized cluster state folder.
        let staging = root.join("staging");
        fs::create_dir_all(staging.join("quay-io-openshift-release")).unwrap();
        fs::write(
            staging.join("quay-io-openshift-release").join("state.yaml"),
            "kind: List\n",
        )
        .unwrap();
        let archive = root.join("gather.tar");
        let status = std::process::Command::new("tar")
            .arg("-cf")
            .arg(&archive)
            .arg("-C")
            .arg(&staging)
            .arg("quay-io-openshift-release")
            .status()
            .expect("tar available");
        assert!(status.success());

        let support_tool = write_stub(
            root,
            "support-tool",
            &format!(
                "#!/bin/sh\nfor last; do :; done\ncp \"{}\" \"$last/gather.tar\"\n",
                archive.display()
            ),
        );
        let inspect_tool = write_stub(
            root,
            "omg",
            "#!/bin/sh\n\
             if [ \"$1\" = \"get\" ]; then\n\
             printf 'NAME AGE\\n---- ---\\nshared-op.v1.0.0 Running\\n'\n\
             fi\n\
             exit 0\n",
        );

        fs::write(
            root.join("export.csv"),
            "Case Number,Openshift Cluster ID,UUID,Account Number\n\
             00123456,cluster-abc,uuid-1,900111\n\
             00123457,cluster-xyz,uuid-2,900222\n",
        )
        .unwrap();
        fs::write(root.join("telemetry-one.txt"), "cluster-xyz\n").unwrap();
        fs::write(root.join("telemetry-two.txt"), "cluster-def\n").unwrap();
        fs::write(root.join("certified.txt"), "\"shared-op\"\n").unwrap();
        fs::write(root.join("redhat.txt"), "shared-op\n").unwrap();

        Self {
            temp,
            support_tool,
            inspect_tool,
        }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn command(&self, report_name: &str) -> Command {
        let root = self.root();
        let mut cmd = Command::cargo_bin("cluster-sweep").unwrap();
        cmd.current_dir(root)
            .arg("--case-export")
            .arg(root.join("export.csv"))
            .arg("--telemetry")
            .arg(root.join("telemetry-one.txt"))
            .arg("--telemetry")
            .arg(root.join("telemetry-two.txt"))
            .arg("--certified-list")
            .arg(root.join("certified.txt"))
            .arg("--redhat-list")
            .arg(root.join("redhat.txt"))
            .arg("--filtered-output")
            .arg(root.join("missing_clusters.csv"))
            .arg("--attachments-dir")
            .arg(root.join("attachments"))
            .arg("--report")
            .arg(root.join(report_name))
            .arg("--support-tool")
            .arg(&self.support_tool)
            .arg("--inspect-tool")
            .arg(&self.inspect_tool);
        cmd
    }
}

#[test]
fn sweep_filters_fetches_and_reports() {
    let fixture = Fixture::new();
    fixture.command("report.json").assert().success();

    // cluster-xyz is known to telemetry; only cluster-abc survives the chain.
    let filtered = fs::read_to_string(fixture.root().join("missing_clusters.csv")).unwrap();
    let lines: Vec<_> = filtered.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Case Number,Openshift Cluster ID,UUID,Account Number",
            "00123456,cluster-abc,uuid-1,900111",
        ]
    );

    let report: Value =
        serde_json::from_str(&fs::read_to_string(fixture.root().join("report.json")).unwrap())
            .unwrap();
    let entries = report.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["Cluster ID"], "cluster-abc");
    assert_eq!(entries[0]["Case Number"], "00123456");
    assert_eq!(entries[0]["Attachment UUID"], "uuid-1");
    assert_eq!(entries[0]["Contact Account Number"], "900111");
    assert_eq!(
        entries[0]["Operators Installed"],
        serde_json::json!(["shared-op.v1.0.0"])
    );
}

#[test]
fn exclusive_registry_keeps_a_shared_name_out_of_the_second_list() {
    let fixture = Fixture::new();
    fixture.command("exclusive.json").assert().success();

    let report: Value =
        serde_json::from_str(&fs::read_to_string(fixture.root().join("exclusive.json")).unwrap())
            .unwrap();
    let entry = &report.as_array().unwrap()[0];
    assert_eq!(
        entry["Certified Operators"],
        serde_json::json!(["shared-op.v1.0.0"])
    );
    assert_eq!(entry["Red Hat Operators"], serde_json::json!([]));
}

#[test]
fn independent_lists_classify_against_both_sets() {
    let fixture = Fixture::new();
    fixture
        .command("independent.json")
        .arg("--independent-lists")
        .assert()
        .success();

    let report: Value = serde_json::from_str(
        &fs::read_to_string(fixture.root().join("independent.json")).unwrap(),
    )
    .unwrap();
    let entry = &report.as_array().unwrap()[0];
    assert_eq!(
        entry["Certified Operators"],
        serde_json::json!(["shared-op.v1.0.0"])
    );
    assert_eq!(
        entry["Red Hat Operators"],
        serde_json::json!(["shared-op.v1.0.0"])
    );
}

#[test]
fn missing_case_export_fails_with_context() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.root().join("export.csv")).unwrap();

    fixture
        .command("report.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to filter"));
}

#[test]
fn rerunning_the_sweep_appends_duplicates() {
    let fixture = Fixture::new();
    fixture.command("report.json").assert().success();
    fixture.command("report.json").assert().success();

    let report: Value =
        serde_json::from_str(&fs::read_to_string(fixture.root().join("report.json")).unwrap())
            .unwrap();
    let entries = report.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["Cluster ID"], entries[1]["Cluster ID"]);
}
