use std::ffi::OsString;
use std::io::{self, Write};

use super::*;

fn run_with_args<I, S>(args: I) -> (i32, String, String)
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run(args, &mut stdout, &mut stderr);
    (
        code,
        String::from_utf8(stdout).expect("stdout is UTF-8"),
        String::from_utf8(stderr).expect("stderr is UTF-8"),
    )
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn help_flag_renders_static_help() {
    for flag in ["--help", "-h"] {
        let (code, stdout, stderr) = run_with_args(["flag-resolve", flag]);
        assert_eq!(code, EXIT_OK);
        assert_eq!(stdout, HELP_TEXT);
        assert!(stderr.is_empty());
    }
}

#[test]
fn version_flag_prints_banner() {
    let (code, stdout, _) = run_with_args(["flag-resolve", "-V"]);
    assert_eq!(code, EXIT_OK);
    assert_eq!(stdout, format!("flag-resolve {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_wins_over_operands() {
    let (code, stdout, _) = run_with_args(["flag-resolve", "NOT_A_FLAG", "--help"]);
    assert_eq!(code, EXIT_OK);
    assert_eq!(stdout, HELP_TEXT);
}

// ============================================================================
// Resolution Output
// ============================================================================

#[test]
fn compressed_point_scenario_prints_defines() {
    let (code, stdout, stderr) =
        run_with_args(["flag-resolve", "MBEDTLS_PK_PARSE_C", "MBEDTLS_ECP_C"]);

    assert_eq!(code, EXIT_OK, "{stderr}");
    assert_eq!(
        stdout,
        concat!(
            "#define MBEDTLS_ECP_C\n",
            "#define MBEDTLS_ECP_LIGHT\n",
            "#define MBEDTLS_PK_PARSE_EC_COMPRESSED\n",
            "#define MBEDTLS_PK_PARSE_C\n",
            "#define MBEDTLS_PK_HAVE_ECC_KEYS\n",
        )
    );
}

#[test]
fn empty_base_prints_nothing() {
    let (code, stdout, stderr) = run_with_args(["flag-resolve"]);
    assert_eq!(code, EXIT_OK);
    assert!(stdout.is_empty());
    assert!(stderr.is_empty());
}

#[test]
fn later_operand_overrides_earlier_one() {
    let (code, stdout, _) = run_with_args(["flag-resolve", "MBEDTLS_MD_C", "MBEDTLS_MD_C=off"]);
    assert_eq!(code, EXIT_OK);
    assert!(stdout.is_empty());
}

#[test]
fn explain_names_the_rule() {
    let (code, stdout, _) = run_with_args(["flag-resolve", "--explain", "MBEDTLS_MD_C"]);
    assert_eq!(code, EXIT_OK);
    assert_eq!(
        stdout,
        concat!(
            "#define MBEDTLS_MD_C /* explicit */\n",
            "#define MBEDTLS_MD_LIGHT /* rule #0 (superset): MBEDTLS_MD_C */\n",
        )
    );
}

#[test]
fn list_format_with_all_covers_vocabulary() {
    let (code, stdout, _) =
        run_with_args(["flag-resolve", "--format", "list", "--all", "MBEDTLS_MD_C"]);
    assert_eq!(code, EXIT_OK);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), catalogue::LEGACY_CRYPTO_FLAGS.len());
    assert_eq!(lines[0], "MBEDTLS_MD_C=on");
    assert_eq!(lines[1], "MBEDTLS_MD_LIGHT=on");
    assert_eq!(lines[2], "MBEDTLS_ECJPAKE_C=off");
}

#[test]
fn json_format_is_machine_readable() {
    let (code, stdout, _) = run_with_args(["flag-resolve", "--format=json", "MBEDTLS_ECDSA_C"]);
    assert_eq!(code, EXIT_OK);

    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(value["flags"]["MBEDTLS_PK_CAN_ECDSA_SOME"], true);
    assert_eq!(value["explicit"], serde_json::json!(["MBEDTLS_ECDSA_C"]));
    assert_eq!(value["derived_by"]["MBEDTLS_PK_CAN_ECDSA_SOME"], 11);
    assert_eq!(value["passes"], 2);
}

#[test]
fn list_rules_prints_table() {
    let (code, stdout, _) = run_with_args(["flag-resolve", "--list-rules"]);
    assert_eq!(code, EXIT_OK);
    assert!(stdout.starts_with("#0 [superset] MBEDTLS_MD_C => MBEDTLS_MD_LIGHT\n"));
    let rules = stdout.lines().filter(|line| line.starts_with('#')).count();
    assert_eq!(rules, catalogue::legacy_crypto_rules().len());
}

#[test]
fn base_file_entries_are_overridden_by_operands() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("base.h");
    std::fs::write(
        &path,
        "// base\n#define MBEDTLS_PK_PARSE_C\n#define MBEDTLS_ECP_C\n",
    )
    .expect("write base file");

    let mut args = vec![OsString::from("flag-resolve"), OsString::from("--base-file")];
    args.push(path.into_os_string());
    args.push(OsString::from("MBEDTLS_ECP_C=0"));
    let (code, stdout, stderr) = run_with_args(args);

    assert_eq!(code, EXIT_OK, "{stderr}");
    assert_eq!(stdout, "#define MBEDTLS_PK_PARSE_C\n");
}

// ============================================================================
// Failures and Exit Codes
// ============================================================================

#[test]
fn unknown_flag_is_a_usage_error() {
    let (code, stdout, stderr) = run_with_args(["flag-resolve", "MBEDTLS_NOPE"]);
    assert_eq!(code, EXIT_USAGE);
    assert!(stdout.is_empty());
    assert_eq!(
        stderr,
        "flag-resolve: error: unknown flag 'MBEDTLS_NOPE' in base set\n"
    );
}

#[test]
fn invalid_value_is_a_usage_error() {
    let (code, _, stderr) = run_with_args(["flag-resolve", "MBEDTLS_MD_C=2"]);
    assert_eq!(code, EXIT_USAGE);
    assert!(stderr.contains("invalid value '2' for flag 'MBEDTLS_MD_C'"));
}

#[test]
fn missing_base_file_is_a_usage_error() {
    let (code, stdout, stderr) =
        run_with_args(["flag-resolve", "--base-file", "/nonexistent/flag-resolve.cfg"]);
    assert_eq!(code, EXIT_USAGE);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("flag-resolve: error: failed to read base file"));
}

#[test]
fn pass_limit_reports_non_convergence() {
    let (code, stdout, stderr) = run_with_args([
        "flag-resolve",
        "--max-passes",
        "1",
        "MBEDTLS_PK_PARSE_C",
        "MBEDTLS_ECP_C",
    ]);
    assert_eq!(code, EXIT_NON_CONVERGENCE);
    assert!(stdout.is_empty());
    assert_eq!(
        stderr,
        "flag-resolve: error: flag resolution did not converge after 1 passes (limit 1)\n"
    );
}

#[test]
fn zero_pass_limit_is_rejected() {
    let (code, stdout, stderr) = run_with_args(["flag-resolve", "--max-passes", "0"]);
    assert_eq!(code, EXIT_USAGE);
    assert!(stdout.is_empty());
    assert!(stderr.contains("not a positive pass count"));
}

#[test]
fn unknown_format_is_rejected() {
    let (code, _, stderr) = run_with_args(["flag-resolve", "--format", "yaml"]);
    assert_eq!(code, EXIT_USAGE);
    assert!(stderr.contains("yaml"));
}

#[test]
fn unknown_option_is_rejected() {
    let (code, _, stderr) = run_with_args(["flag-resolve", "--frobnicate"]);
    assert_eq!(code, EXIT_USAGE);
    assert!(stderr.contains("--frobnicate"));
}

#[test]
fn write_failure_maps_to_output_exit_code() {
    let mut stderr = Vec::new();
    let code = run(["flag-resolve", "MBEDTLS_MD_C"], &mut FailingWriter, &mut stderr);
    assert_eq!(code, EXIT_OUTPUT);
    let stderr = String::from_utf8(stderr).expect("stderr is UTF-8");
    assert!(stderr.starts_with("flag-resolve: error: failed to write output"));
}

#[test]
fn exit_code_is_clamped() {
    assert_eq!(exit_code_from(-1), std::process::ExitCode::from(0));
    assert_eq!(exit_code_from(EXIT_NON_CONVERGENCE), std::process::ExitCode::from(2));
    assert_eq!(exit_code_from(1000), std::process::ExitCode::from(255));
}
