//! Bundle command integration tests.

use predicates::prelude::*;

use super::common::{TestEnv, bundle_of};

#[test]
fn bundle_collects_every_data_mapper() {
  let env = TestEnv::new();
  let orders = env.add_module("orders");
  let customers = env.add_module("customers");

  env
    .dmbundle_cmd()
    .arg("bundle")
    .assert()
    .success()
    .stdout(predicate::str::contains("Data mapper bundling complete"))
    .stdout(predicate::str::contains("Bundled: 2"));

  assert_eq!(bundle_of(&orders).unwrap().trim(), "// bundle of orders");
  assert_eq!(bundle_of(&customers).unwrap().trim(), "// bundle of customers");
  env.assert_clean();
  assert!(env.root().join("pom.xml").exists());
}

#[test]
fn bundle_with_explicit_paths() {
  let env = TestEnv::new();
  env.write_file("resources/datamapper/orders/orders.ts", "export {}");
  let elsewhere = tempfile::TempDir::new().unwrap();

  env
    .dmbundle_cmd()
    .current_dir(elsewhere.path())
    .args(["bundle", "--resources", "resources", "-C"])
    .arg(env.root())
    .assert()
    .success();

  assert!(env.root().join("resources/datamapper/orders/bundle.js").exists());
  env.assert_clean();
}

#[test]
fn bundle_json_report() {
  let env = TestEnv::new();
  env.add_module("orders");

  env
    .dmbundle_cmd()
    .args(["bundle", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""status": "completed""#))
    .stdout(predicate::str::contains(r#""toolchain_home": "/opt/fake-maven""#));
}

#[test]
fn bundle_with_no_data_mappers_succeeds() {
  let env = TestEnv::new();

  env
    .dmbundle_cmd()
    .arg("bundle")
    .assert()
    .success()
    .stdout(predicate::str::contains("Bundled: 0"));

  env.assert_clean();
}

#[test]
fn module_failure_aborts_remaining_modules() {
  let env = TestEnv::new();
  let alpha = env.add_module("alpha");
  let beta = env.add_module("beta");
  let gamma = env.add_module("gamma");

  env
    .dmbundle_cmd()
    .env("FAKE_FAIL_MODULE", "beta")
    .arg("bundle")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to bundle data mapper: beta"))
    .stdout(predicate::str::contains("Skipped: gamma"));

  assert!(bundle_of(&alpha).is_some());
  assert!(bundle_of(&beta).is_none());
  assert!(bundle_of(&gamma).is_none());
  env.assert_clean();
}

#[test]
fn continue_policy_builds_remaining_modules() {
  let env = TestEnv::new();
  let alpha = env.add_module("alpha");
  let beta = env.add_module("beta");
  let gamma = env.add_module("gamma");

  env
    .dmbundle_cmd()
    .env("FAKE_FAIL_MODULE", "beta")
    .args(["bundle", "--on-failure", "continue"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("Failed: 1"));

  assert!(bundle_of(&alpha).is_some());
  assert!(bundle_of(&beta).is_none());
  assert!(bundle_of(&gamma).is_some());
  env.assert_clean();
}

#[test]
fn dependency_install_failure_bundles_nothing() {
  let env = TestEnv::new();
  let orders = env.add_module("orders");

  env
    .dmbundle_cmd()
    .env("FAKE_FAIL_GOAL", "install")
    .arg("bundle")
    .assert()
    .failure()
    .stderr(predicate::str::contains("npm install failed"));

  assert!(bundle_of(&orders).is_none());
  env.assert_clean();
}

#[test]
fn missing_maven_creates_nothing() {
  let env = TestEnv::new();
  env.add_module("orders");

  env
    .dmbundle_cmd()
    .env("DMBUNDLE_MVN", env.root().join("no-such-mvn"))
    .arg("bundle")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Could not determine Maven home"));

  assert!(!env.root().join("package.json").exists());
  assert!(!env.root().join("data-mapper").exists());
}
