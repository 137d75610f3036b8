use anyhow::Result;
use predicates::prelude::*;
use syn::{Expr, Item, Lit, Stmt};

use crate::common::TestProject;

/// Decode the `(package, license_text)` pairs from generated source, in order.
fn embedded_records(source: &str, function_name: &str) -> Vec<(String, String)> {
    let file = syn::parse_file(source).expect("generated module parses");
    let function = file
        .items
        .iter()
        .find_map(|item| match item {
            Item::Fn(function) if function.sig.ident == function_name => Some(function),
            _ => None,
        })
        .expect("accessor function present");

    let string_field = |fields: &syn::punctuated::Punctuated<syn::FieldValue, syn::Token![,]>,
                        name: &str| {
        fields
            .iter()
            .find_map(|field| match (&field.member, &field.expr) {
                (syn::Member::Named(ident), Expr::Lit(lit)) if ident == name => match &lit.lit {
                    Lit::Str(value) => Some(value.value()),
                    _ => None,
                },
                _ => None,
            })
            .expect("string field present")
    };

    function
        .block
        .stmts
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Expr(Expr::MethodCall(call), Some(_)) if call.method == "push" => {
                match call.args.first() {
                    Some(Expr::Struct(record)) => Some((
                        string_field(&record.fields, "package"),
                        string_field(&record.fields, "license_text"),
                    )),
                    _ => None,
                }
            }
            _ => None,
        })
        .collect()
}

#[test]
fn test_generates_module_for_example_dependencies() -> Result<()> {
    let mut project = TestProject::new()?;
    project.add_dependency("a", "1.0.0", &[("LICENSE", b"MIT License\n")])?;
    project.add_dependency("c", "2.0.0", &[("LICENSE-APACHE", b"Apache License 2.0\n")])?;
    project.write_metadata()?;

    project.run_licensed(&["-o", "src/licenses_generated.rs"])?.assert_success();

    let output = project.read_file("src/licenses_generated.rs")?;
    assert!(output.starts_with("// @generated by licensed"));
    assert!(output.contains("bundled into `demo_app`"));
    assert!(output.contains("pub struct LicenseInfo"));
    assert_eq!(
        embedded_records(&output, "license_infos"),
        vec![
            ("a".to_string(), "MIT License\n".to_string()),
            ("c".to_string(), "Apache License 2.0\n".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_record_order_follows_dependency_order() -> Result<()> {
    let mut project = TestProject::new()?;
    for name in ["zeta", "alpha", "mid"] {
        project.add_dependency(name, "1.0.0", &[("LICENSE", name.as_bytes())])?;
    }
    project.write_metadata()?;

    project.run_licensed(&["-o", "src/licenses_generated.rs"])?.assert_success();

    let output = project.read_file("src/licenses_generated.rs")?;
    let packages: Vec<String> =
        embedded_records(&output, "license_infos").into_iter().map(|(package, _)| package).collect();
    assert_eq!(packages, vec!["alpha", "mid", "zeta"]);
    Ok(())
}

#[test]
fn test_tricky_license_text_round_trips() -> Result<()> {
    let tricky = "Copyright \"Quoted\" Authors\n\
                  C:\\path\\to\\file and \\n literally\n\
                  {{ not_a_template }} {% raw %} {# comment #}\n\
                  r#\"raw\"# and \"## hashes\n\
                  tab\tcarriage\r\nnul\0end\n\
                  unicode: é ☃ 日本語\n";

    let mut project = TestProject::new()?;
    project.add_dependency("tricky", "0.1.0", &[("LICENSE", tricky.as_bytes())])?;
    project.write_metadata()?;

    project.run_licensed(&["-o", "src/licenses_generated.rs"])?.assert_success();

    let output = project.read_file("src/licenses_generated.rs")?;
    assert_eq!(
        embedded_records(&output, "license_infos"),
        vec![("tricky".to_string(), tricky.to_string())]
    );
    Ok(())
}

#[test]
fn test_generation_is_idempotent() -> Result<()> {
    let mut project = TestProject::new()?;
    project.add_dependency("serde", "1.0.210", &[("LICENSE-MIT", b"MIT\n")])?;
    project.add_dependency("syn", "2.0.77", &[("LICENSE-APACHE", b"Apache\n")])?;
    project.write_metadata()?;

    project.run_licensed(&["-o", "src/licenses_generated.rs"])?.assert_success();
    let first = project.read_file("src/licenses_generated.rs")?;

    project.run_licensed(&["-o", "src/licenses_generated.rs"])?.assert_success();
    let second = project.read_file("src/licenses_generated.rs")?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_stdout_sentinel_writes_no_file() -> Result<()> {
    let mut project = TestProject::new()?;
    project.add_dependency("serde", "1.0.210", &[("LICENSE", b"MIT\n")])?;
    project.write_metadata()?;

    project
        .command()
        .args(["-o", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pub fn license_infos() -> Vec<LicenseInfo>"))
        .stdout(predicate::str::contains("package: \"serde\""));

    assert!(!project.project_path().join("-").exists());
    assert!(!project.project_path().join("licenses_generated.rs").exists());
    Ok(())
}

#[test]
fn test_stdout_sentinel_leaves_default_destination_untouched() -> Result<()> {
    let mut project = TestProject::new()?;
    project.add_dependency("serde", "1.0.210", &[("LICENSE", b"MIT\n")])?;
    project.write_metadata()?;
    let previous = "// hand-maintained, must survive\npub fn keep() {}\n";
    project.write_file("licenses_generated.rs", previous)?;

    let output = project.run_licensed(&["-o", "-"])?;
    output.assert_success();
    assert_eq!(
        embedded_records(&output.stdout, "license_infos"),
        vec![("serde".to_string(), "MIT\n".to_string())]
    );

    let after = std::fs::read(project.project_path().join("licenses_generated.rs"))?;
    assert_eq!(after, previous.as_bytes());
    Ok(())
}

#[test]
fn test_default_output_from_project_root() -> Result<()> {
    let mut project = TestProject::new()?;
    project.add_dependency("serde", "1.0.210", &[("LICENSE", b"MIT\n")])?;
    project.write_metadata()?;

    project.run_licensed(&[])?.assert_success();

    let output = project.read_file("licenses_generated.rs")?;
    assert!(output.contains("bundled into `demo_app`"));
    assert_eq!(embedded_records(&output, "license_infos").len(), 1);
    Ok(())
}

#[test]
fn test_custom_function_and_type_names() -> Result<()> {
    let mut project = TestProject::new()?;
    project.add_dependency("serde", "1.0.210", &[("LICENSE", b"MIT\n")])?;
    project.write_metadata()?;

    project
        .run_licensed(&[
            "-o",
            "src/third_party.rs",
            "--func",
            "third_party_licenses",
            "--type",
            "ThirdPartyLicense",
        ])?
        .assert_success();

    let output = project.read_file("src/third_party.rs")?;
    assert!(output.contains("pub struct ThirdPartyLicense"));
    assert!(output.contains("pub fn third_party_licenses() -> Vec<ThirdPartyLicense>"));
    assert_eq!(embedded_records(&output, "third_party_licenses").len(), 1);
    Ok(())
}

#[test]
fn test_prefers_exact_license_file() -> Result<()> {
    let mut project = TestProject::new()?;
    project.add_dependency(
        "dual",
        "1.0.0",
        &[("LICENSE-APACHE", b"apache"), ("LICENSE", b"exact"), ("LICENSE-MIT", b"mit")],
    )?;
    project.add_dependency("pair", "1.0.0", &[("LICENSE-MIT", b"mit"), ("LICENSE-APACHE", b"apache")])?;
    project.write_metadata()?;

    project.run_licensed(&["-o", "src/licenses_generated.rs"])?.assert_success();

    let output = project.read_file("src/licenses_generated.rs")?;
    assert_eq!(
        embedded_records(&output, "license_infos"),
        vec![
            ("dual".to_string(), "exact".to_string()),
            ("pair".to_string(), "apache".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_custom_license_pattern() -> Result<()> {
    let mut project = TestProject::new()?;
    project.add_dependency("gnu", "1.0.0", &[("COPYING", b"GPL text")])?;
    project.write_metadata()?;

    project
        .run_licensed(&["-o", "src/licenses_generated.rs", "--license-pattern", "COPYING*"])?
        .assert_success();

    let output = project.read_file("src/licenses_generated.rs")?;
    assert_eq!(
        embedded_records(&output, "license_infos"),
        vec![("gnu".to_string(), "GPL text".to_string())]
    );
    Ok(())
}

#[test]
fn test_multiple_versions_use_vendor_directory_names() -> Result<()> {
    let mut project = TestProject::new()?;
    project.add_dependency("syn", "2.0.77", &[("LICENSE", b"syn 2")])?;
    project.add_dependency("syn", "1.0.109", &[])?;
    project.vendor_files("syn-1.0.109", &[("LICENSE", b"syn 1")])?;
    project.write_metadata()?;

    project.run_licensed(&["-o", "src/licenses_generated.rs"])?.assert_success();

    let output = project.read_file("src/licenses_generated.rs")?;
    assert_eq!(
        embedded_records(&output, "license_infos"),
        vec![
            ("syn-1.0.109".to_string(), "syn 1".to_string()),
            ("syn".to_string(), "syn 2".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_runs_from_subdirectory_with_explicit_root() -> Result<()> {
    let mut project = TestProject::new()?;
    project.add_dependency("serde", "1.0.210", &[("LICENSE", b"MIT\n")])?;
    project.write_metadata()?;

    project
        .bare_command()
        .current_dir(project.project_path().join("src"))
        .args(["--metadata", "../metadata.json", "--root", "..", "-o", "licenses_generated.rs"])
        .assert()
        .success();

    assert!(project.project_path().join("src/licenses_generated.rs").exists());
    Ok(())
}

#[test]
fn test_no_dependencies_generates_empty_list() -> Result<()> {
    let project = TestProject::new()?;
    project.write_metadata()?;

    project.run_licensed(&["-o", "src/licenses_generated.rs"])?.assert_success();

    let output = project.read_file("src/licenses_generated.rs")?;
    assert!(embedded_records(&output, "license_infos").is_empty());
    assert!(output.contains("Vec::with_capacity(0)"));
    Ok(())
}
