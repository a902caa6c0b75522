#[cfg(test)]
mod tests {
    use super::super::*;

    fn out(stdout: &str) -> ProbeOutput {
        ProbeOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn parse(platform: Platform, tool: &str, output: &ProbeOutput) -> Option<String> {
        let probe = platform
            .probes()
            .iter()
            .find(|p| p.tool == tool)
            .unwrap_or_else(|| panic!("{} has no probe for {}", platform, tool));
        (probe.parse)(output)
    }

    #[test]
    fn test_platform_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
        assert!("fortran".parse::<Platform>().is_err());
        assert!("all".parse::<Platform>().is_err());
    }

    #[test]
    fn test_unsupported_platform_error_lists_supported() {
        let err = "fortran".parse::<Platform>().unwrap_err().to_string();
        assert!(err.contains("Unsupported platform 'fortran'"));
        assert!(err.contains("python"));
        assert!(err.contains("dotnet"));
    }

    #[test]
    fn test_parse_uv() {
        assert_eq!(
            parse(Platform::Python, "uv", &out("uv 0.4.18")),
            Some("0.4.18".to_string())
        );
    }

    #[test]
    fn test_parse_py_spy() {
        assert_eq!(
            parse(Platform::Python, "py-spy", &out("py-spy 0.3.14")),
            Some("0.3.14".to_string())
        );
    }

    #[test]
    fn test_parse_nvm_first_token() {
        assert_eq!(
            parse(Platform::Nodejs, "nvm", &out("0.39.7\n")),
            Some("0.39.7".to_string())
        );
    }

    #[test]
    fn test_parse_rbenv_first_token() {
        assert_eq!(
            parse(Platform::Ruby, "rbenv", &out("rbenv 1.2.0")),
            Some("rbenv".to_string())
        );
    }

    #[test]
    fn test_parse_php_second_token() {
        assert_eq!(
            parse(
                Platform::Php,
                "php",
                &out("PHP 8.2.10 (cli) (built: Sep  2 2023)\nCopyright (c) The PHP Group")
            ),
            Some("8.2.10".to_string())
        );
    }

    #[test]
    fn test_parse_composer() {
        assert_eq!(
            parse(
                Platform::Php,
                "composer",
                &out("Composer version 2.6.5 2023-10-06 10:11:52")
            ),
            Some("2.6.5".to_string())
        );
    }

    #[test]
    fn test_parse_perf() {
        assert_eq!(
            parse(Platform::Native, "perf", &out("perf version 6.16.0")),
            Some("6.16.0".to_string())
        );
    }

    #[test]
    fn test_parse_binutils_last_dotted_token() {
        assert_eq!(
            parse(
                Platform::Native,
                "binutils",
                &out("GNU objdump (GNU Binutils for Ubuntu) 2.38\nCopyright (C) 2022")
            ),
            Some("2.38".to_string())
        );
    }

    #[test]
    fn test_parse_erlang_trimmed() {
        assert_eq!(
            parse(Platform::Beam, "erlang", &out("27")),
            Some("27".to_string())
        );
    }

    #[test]
    fn test_parse_elixir() {
        assert_eq!(
            parse(
                Platform::Beam,
                "elixir",
                &out("Elixir 1.18.0 (compiled with Erlang/OTP 27)")
            ),
            Some("1.18.0".to_string())
        );
    }

    #[test]
    fn test_parse_rebar3() {
        assert_eq!(
            parse(
                Platform::Beam,
                "rebar3",
                &out("rebar 3.25.0 on Erlang/OTP 27 Erts 14.1.1")
            ),
            Some("3.25.0".to_string())
        );
    }

    #[test]
    fn test_parse_java_from_stderr() {
        let output = ProbeOutput {
            stdout: String::new(),
            stderr: "openjdk version \"21.0.2\" 2024-01-16 LTS\nOpenJDK Runtime Environment"
                .to_string(),
        };
        assert_eq!(
            parse(Platform::Jvm, "java", &output),
            Some("21.0.2".to_string())
        );
    }

    #[test]
    fn test_parse_java_unquoted_falls_back_to_line() {
        let output = ProbeOutput {
            stdout: String::new(),
            stderr: "java version 21".to_string(),
        };
        assert_eq!(
            parse(Platform::Jvm, "java", &output),
            Some("java version 21".to_string())
        );
    }

    #[test]
    fn test_parse_maven() {
        assert_eq!(
            parse(
                Platform::Jvm,
                "maven",
                &out("Apache Maven 3.9.11 (2be3a3a7f9b4a3c1f)\nMaven home: /opt/maven")
            ),
            Some("3.9.11".to_string())
        );
    }

    #[test]
    fn test_parse_gradle_scans_banner() {
        assert_eq!(
            parse(
                Platform::Jvm,
                "gradle",
                &out("\n------------------------------------------------------------\nGradle 9.0.0\n------------------------------------------------------------\n")
            ),
            Some("9.0.0".to_string())
        );
    }

    #[test]
    fn test_parse_async_profiler() {
        assert_eq!(
            parse(
                Platform::Jvm,
                "async-profiler",
                &out("Async-profiler 4.1 built on Jul 21 2025")
            ),
            Some("4.1".to_string())
        );
    }

    #[test]
    fn test_parse_dotnet_trace_dotted_run() {
        assert_eq!(
            parse(
                Platform::Dotnet,
                "dotnet-trace",
                &out("Tool 'dotnet-trace' version 8.0.452401 is ready\n")
            ),
            Some("8.0.452401".to_string())
        );
        assert_eq!(
            parse(Platform::Dotnet, "dotnet-trace", &out("8.0.452401")),
            Some("8.0.452401".to_string())
        );
    }

    #[test]
    fn test_parsers_idempotent_on_normalized_input() {
        // Feeding an already-normalized version back through a rule must
        // leave it unchanged
        assert_eq!(
            parse(Platform::Python, "uv", &out("0.4.18")),
            Some("0.4.18".to_string())
        );
        assert_eq!(
            parse(Platform::Php, "composer", &out("2.6.5")),
            Some("2.6.5".to_string())
        );
        assert_eq!(
            parse(Platform::Jvm, "gradle", &out("9.0.0")),
            Some("9.0.0".to_string())
        );
        assert_eq!(
            parse(Platform::Beam, "rebar3", &out("3.25.0")),
            Some("3.25.0".to_string())
        );
    }

    #[test]
    fn test_parsers_total_on_garbage() {
        // Unexpected output falls back to the raw trimmed text, never panics
        for platform in Platform::ALL {
            for probe in platform.probes() {
                let garbage = out("  something completely unexpected  ");
                let parsed = (probe.parse)(&garbage);
                assert!(parsed.is_some(), "{} dropped unexpected output", probe.tool);
            }
        }
    }

    #[test]
    fn test_parsers_absent_on_empty_output() {
        for platform in Platform::ALL {
            for probe in platform.probes() {
                let empty = ProbeOutput {
                    stdout: String::new(),
                    stderr: String::new(),
                };
                assert_eq!((probe.parse)(&empty), None, "{}", probe.tool);
            }
        }
    }

    #[test]
    fn test_probe_tables_list_expected_tools() {
        let tools: Vec<&str> = Platform::Jvm.probes().iter().map(|p| p.tool).collect();
        assert_eq!(tools, vec!["java", "maven", "gradle", "async-profiler"]);
        let tools: Vec<&str> = Platform::Php.probes().iter().map(|p| p.tool).collect();
        assert_eq!(tools, vec!["php", "composer", "excimer"]);
    }
}
