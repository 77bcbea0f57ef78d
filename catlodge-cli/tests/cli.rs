//! End-to-end CLI tests.
//!
//! These drive the compiled binary against an isolated data directory,
//! covering the catalog-to-booking flow and the error surface.

use assert_cmd::cargo::cargo_bin;
use std::process::Command;
use tempfile::TempDir;

fn catlodge_cmd(data_dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("catlodge"));
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

fn stdout_line(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_help_lists_commands() {
    let output = Command::new(cargo_bin("catlodge"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    assert!(help.contains("book"));
    assert!(help.contains("availability"));
    assert!(help.contains("pricing-import"));
}

#[test]
fn test_init_creates_store() {
    let dir = TempDir::new().unwrap();
    let status = catlodge_cmd(&dir).arg("init").status().unwrap();
    assert!(status.success());
    assert!(dir.path().join("catlodge.db").exists());
}

#[test]
fn test_catalog_to_booking_flow() {
    let dir = TempDir::new().unwrap();
    assert!(catlodge_cmd(&dir).arg("init").status().unwrap().success());

    let category = stdout_line(
        &catlodge_cmd(&dir)
            .args(["add-category", "--name", "Suite", "--rate", "100", "--capacity", "4"])
            .output()
            .unwrap(),
    );
    assert!(catlodge_cmd(&dir)
        .args(["add-unit", "--category", &category, "--capacity", "4"])
        .status()
        .unwrap()
        .success());
    let cat = stdout_line(
        &catlodge_cmd(&dir)
            .args(["add-cat", "--name", "Miso"])
            .output()
            .unwrap(),
    );

    // Availability shows the empty unit.
    let availability = catlodge_cmd(&dir)
        .args([
            "availability",
            "--category",
            &category,
            "--check-in",
            "2099-01-10",
            "--check-out",
            "2099-01-12",
        ])
        .output()
        .unwrap();
    assert!(availability.status.success());
    assert!(stdout_line(&availability).contains("free 4/4"));

    // Book through the staff channel.
    let booked = catlodge_cmd(&dir)
        .args([
            "book",
            "--category",
            &category,
            "--check-in",
            "2099-01-10",
            "--check-out",
            "2099-01-12",
            "--cat",
            &cat,
            "--staff",
        ])
        .output()
        .unwrap();
    assert!(booked.status.success());
    let code = stdout_line(&booked);
    assert!(code.starts_with("CB-"), "got '{code}'");

    // The reservation shows up CONFIRMED, then checks in and out.
    let listed = catlodge_cmd(&dir).arg("list").output().unwrap();
    assert!(String::from_utf8_lossy(&listed.stdout).contains("CONFIRMED"));

    assert!(catlodge_cmd(&dir)
        .args(["check-in", &code])
        .status()
        .unwrap()
        .success());
    assert!(catlodge_cmd(&dir)
        .args(["check-out", &code])
        .status()
        .unwrap()
        .success());
}

#[test]
fn test_conflicting_booking_fails_with_code() {
    let dir = TempDir::new().unwrap();
    assert!(catlodge_cmd(&dir).arg("init").status().unwrap().success());

    let category = stdout_line(
        &catlodge_cmd(&dir)
            .args(["add-category", "--name", "Suite", "--rate", "100", "--capacity", "4"])
            .output()
            .unwrap(),
    );
    catlodge_cmd(&dir)
        .args(["add-unit", "--category", &category, "--capacity", "4"])
        .status()
        .unwrap();
    let cat = stdout_line(
        &catlodge_cmd(&dir)
            .args(["add-cat", "--name", "Miso"])
            .output()
            .unwrap(),
    );

    let book = |check_in: &str, check_out: &str| {
        catlodge_cmd(&dir)
            .args([
                "book",
                "--category",
                &category,
                "--check-in",
                check_in,
                "--check-out",
                check_out,
                "--cat",
                &cat,
                "--staff",
            ])
            .output()
            .unwrap()
    };

    assert!(book("2099-01-10", "2099-01-12").status.success());

    // Same cat, overlapping window: exit code 1 and the CAT_CONFLICT code.
    let conflict = book("2099-01-11", "2099-01-13");
    assert_eq!(conflict.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&conflict.stderr);
    assert!(stderr.contains("CAT_CONFLICT"), "stderr was: {stderr}");
    assert!(stderr.contains("Miso"));

    // Back-to-back is fine.
    assert!(book("2099-01-12", "2099-01-14").status.success());
}

#[test]
fn test_guest_booking_requires_customer() {
    let dir = TempDir::new().unwrap();
    assert!(catlodge_cmd(&dir).arg("init").status().unwrap().success());

    let category = stdout_line(
        &catlodge_cmd(&dir)
            .args(["add-category", "--name", "Suite", "--rate", "100", "--capacity", "4"])
            .output()
            .unwrap(),
    );
    catlodge_cmd(&dir)
        .args(["add-unit", "--category", &category, "--capacity", "4"])
        .status()
        .unwrap();
    let cat = stdout_line(
        &catlodge_cmd(&dir)
            .args(["add-cat", "--name", "Miso"])
            .output()
            .unwrap(),
    );

    let output = catlodge_cmd(&dir)
        .args([
            "book",
            "--category",
            &category,
            "--check-in",
            "2099-01-10",
            "--check-out",
            "2099-01-12",
            "--cat",
            &cat,
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("CUSTOMER_ID_REQUIRED"));
}

#[test]
fn test_pricing_import_and_quote() {
    let dir = TempDir::new().unwrap();
    assert!(catlodge_cmd(&dir).arg("init").status().unwrap().success());

    let category = stdout_line(
        &catlodge_cmd(&dir)
            .args(["add-category", "--name", "Suite", "--rate", "100", "--capacity", "4"])
            .output()
            .unwrap(),
    );
    catlodge_cmd(&dir)
        .args(["add-unit", "--category", &category, "--capacity", "4"])
        .status()
        .unwrap();
    let cat_a = stdout_line(
        &catlodge_cmd(&dir)
            .args(["add-cat", "--name", "Miso"])
            .output()
            .unwrap(),
    );
    let cat_b = stdout_line(
        &catlodge_cmd(&dir)
            .args(["add-cat", "--name", "Pixel"])
            .output()
            .unwrap(),
    );
    let cat_c = stdout_line(
        &catlodge_cmd(&dir)
            .args(["add-cat", "--name", "Clementine"])
            .output()
            .unwrap(),
    );

    let payload = dir.path().join("pricing.json");
    std::fs::write(
        &payload,
        r#"{
            "multiCatDiscountEnabled": true,
            "multiCatDiscounts": [{"catCount": 3, "discountPercent": 10}],
            "sharedRoomDiscountEnabled": false,
            "longStayDiscountEnabled": false
        }"#,
    )
    .unwrap();

    let imported = catlodge_cmd(&dir)
        .args(["pricing-import", "--file", payload.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(imported.status.success());
    assert_eq!(stdout_line(&imported), "1");

    // 4 nights x 100 with the (3, 10%) tier: 360.
    let quoted = catlodge_cmd(&dir)
        .args([
            "quote",
            "--category",
            &category,
            "--check-in",
            "2099-01-10",
            "--check-out",
            "2099-01-14",
            "--cat",
            &cat_a,
            "--cat",
            &cat_b,
            "--cat",
            &cat_c,
        ])
        .output()
        .unwrap();
    assert!(quoted.status.success());
    let text = String::from_utf8_lossy(&quoted.stdout);
    assert!(text.contains("total:     360"), "stdout was: {text}");

    // Nothing was booked by quoting.
    let listed = catlodge_cmd(&dir).args(["--quiet", "list"]).output().unwrap();
    assert!(stdout_line(&listed).is_empty());
}
