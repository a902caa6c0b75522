//! Platform catalog
//!
//! Single source of truth for the supported profiling environments: which
//! tools are probed inside each image and how their free-form version
//! output is normalized. Adding a platform or tool is a catalog edit only;
//! no other component changes.

use anyhow::bail;
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
mod tests;

/// Closed set of supported profiling environments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Python,
    Nodejs,
    Ruby,
    Php,
    Native,
    Beam,
    Jvm,
    Dotnet,
}

/// Raw output captured from a probe command
pub struct ProbeOutput {
    pub stdout: String,
    pub stderr: String,
}

/// One version probe: the command run inside the image and the rule that
/// normalizes its output
pub struct ToolProbe {
    pub tool: &'static str,
    pub command: &'static [&'static str],
    pub parse: fn(&ProbeOutput) -> Option<String>,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::Python,
        Platform::Nodejs,
        Platform::Ruby,
        Platform::Php,
        Platform::Native,
        Platform::Beam,
        Platform::Jvm,
        Platform::Dotnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Python => "python",
            Platform::Nodejs => "nodejs",
            Platform::Ruby => "ruby",
            Platform::Php => "php",
            Platform::Native => "native",
            Platform::Beam => "beam",
            Platform::Jvm => "jvm",
            Platform::Dotnet => "dotnet",
        }
    }

    /// Ordered probe table for this platform. Only tools installed by the
    /// platform's Dockerfile are listed; tools added by bootstrap scripts
    /// are not probed.
    pub fn probes(&self) -> &'static [ToolProbe] {
        match self {
            Platform::Python => &PYTHON_PROBES,
            Platform::Nodejs => &NODEJS_PROBES,
            Platform::Ruby => &RUBY_PROBES,
            Platform::Php => &PHP_PROBES,
            Platform::Native => &NATIVE_PROBES,
            Platform::Beam => &BEAM_PROBES,
            Platform::Jvm => &JVM_PROBES,
            Platform::Dotnet => &DOTNET_PROBES,
        }
    }

    pub fn base_description(&self) -> &'static str {
        match self {
            Platform::Python => {
                "Python profiling environment with uv package manager and py-spy profiler"
            }
            Platform::Nodejs => {
                "Node.js profiling environment with nvm version manager and 0x profiler"
            }
            Platform::Ruby => {
                "Ruby profiling environment with rbenv version manager and rbspy profiler"
            }
            Platform::Php => {
                "PHP profiling environment with Composer package manager and Excimer profiler"
            }
            Platform::Native => {
                "Native code profiling environment with perf profiler and binary analysis tools"
            }
            Platform::Beam => {
                "BEAM VM (Erlang/Elixir) profiling environment with Linux perf JIT integration"
            }
            Platform::Jvm => {
                "JVM profiling environment with async-profiler for Java/Kotlin/Scala applications"
            }
            Platform::Dotnet => {
                ".NET profiling environment with dotnet-trace profiler for C#/F#/VB.NET applications"
            }
        }
    }

    /// Presentation order and display names for the description sentence.
    /// This is a contract of its own, independent of probe order.
    pub fn presentation(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Platform::Python => &[("uv", "uv"), ("py-spy", "py-spy")],
            Platform::Nodejs => &[("nvm", "nvm")],
            Platform::Ruby => &[("rbenv", "rbenv"), ("rbspy", "rbspy")],
            Platform::Php => &[("php", "PHP"), ("composer", "Composer"), ("excimer", "Excimer")],
            Platform::Native => &[("perf", "perf"), ("binutils", "binutils")],
            Platform::Beam => &[
                ("erlang", "Erlang/OTP"),
                ("elixir", "Elixir"),
                ("rebar3", "Rebar3"),
            ],
            Platform::Jvm => &[
                ("java", "OpenJDK"),
                ("maven", "Maven"),
                ("gradle", "Gradle"),
                ("async-profiler", "async-profiler"),
            ],
            Platform::Dotnet => &[("dotnet", ".NET"), ("dotnet-trace", "dotnet-trace")],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for platform in Platform::ALL {
            if platform.as_str() == s {
                return Ok(platform);
            }
        }
        let supported: Vec<&str> = Platform::ALL.iter().map(|p| p.as_str()).collect();
        bail!(
            "Unsupported platform '{}'. Supported: {}",
            s,
            supported.join(", ")
        )
    }
}

static PYTHON_PROBES: [ToolProbe; 2] = [
    ToolProbe {
        tool: "uv",
        command: &["uv", "--version"],
        parse: parse_uv,
    },
    ToolProbe {
        tool: "py-spy",
        command: &["py-spy", "--version"],
        parse: parse_py_spy,
    },
];

static NODEJS_PROBES: [ToolProbe; 1] = [ToolProbe {
    tool: "nvm",
    command: &["bash", "-c", "source /root/.nvm/nvm.sh && nvm --version"],
    parse: parse_first_token,
}];

static RUBY_PROBES: [ToolProbe; 2] = [
    ToolProbe {
        tool: "rbspy",
        command: &["rbspy", "--version"],
        parse: parse_rbspy,
    },
    ToolProbe {
        tool: "rbenv",
        command: &["/usr/local/rbenv/bin/rbenv", "--version"],
        parse: parse_first_token,
    },
];

static PHP_PROBES: [ToolProbe; 3] = [
    ToolProbe {
        tool: "php",
        command: &["php", "-v"],
        parse: parse_php,
    },
    ToolProbe {
        tool: "composer",
        command: &["composer", "--version"],
        parse: parse_composer,
    },
    ToolProbe {
        tool: "excimer",
        command: &["php", "-r", "echo phpversion('excimer');"],
        parse: parse_trimmed,
    },
];

static NATIVE_PROBES: [ToolProbe; 2] = [
    ToolProbe {
        tool: "perf",
        command: &["perf", "version"],
        parse: parse_perf,
    },
    ToolProbe {
        tool: "binutils",
        command: &["objdump", "--version"],
        parse: parse_binutils,
    },
];

static BEAM_PROBES: [ToolProbe; 3] = [
    ToolProbe {
        tool: "erlang",
        command: &[
            "erl",
            "-noshell",
            "-eval",
            "io:format(\"~s\", [erlang:system_info(otp_release)]), halt().",
        ],
        parse: parse_trimmed,
    },
    ToolProbe {
        tool: "elixir",
        command: &["elixir", "--version"],
        parse: parse_elixir,
    },
    ToolProbe {
        tool: "rebar3",
        command: &["rebar3", "--version"],
        parse: parse_rebar3,
    },
];

static JVM_PROBES: [ToolProbe; 4] = [
    ToolProbe {
        tool: "java",
        command: &["java", "-version"],
        parse: parse_java,
    },
    ToolProbe {
        tool: "maven",
        command: &["mvn", "--version"],
        parse: parse_maven,
    },
    ToolProbe {
        tool: "gradle",
        command: &["gradle", "--version"],
        parse: parse_gradle,
    },
    ToolProbe {
        tool: "async-profiler",
        command: &["/opt/async-profiler/bin/asprof", "--version"],
        parse: parse_async_profiler,
    },
];

static DOTNET_PROBES: [ToolProbe; 2] = [
    ToolProbe {
        tool: "dotnet",
        command: &["dotnet", "--version"],
        parse: parse_trimmed,
    },
    ToolProbe {
        tool: "dotnet-trace",
        command: &["dotnet-trace", "--version"],
        parse: parse_dotnet_trace,
    },
];

// Parsing rules. Each rule is total: on unexpected output it falls back to
// the raw trimmed text rather than failing, so drift in a tool's output
// format never aborts extraction. Empty output means no data.

fn nonempty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn strip_prefix_or_raw(raw: &str, prefix: &str) -> Option<String> {
    let trimmed = raw.trim();
    match trimmed.strip_prefix(prefix) {
        Some(rest) => nonempty(rest),
        None => nonempty(trimmed),
    }
}

/// "uv 0.4.18" -> "0.4.18"
fn parse_uv(out: &ProbeOutput) -> Option<String> {
    strip_prefix_or_raw(&out.stdout, "uv ")
}

/// "py-spy 0.3.14" -> "0.3.14"
fn parse_py_spy(out: &ProbeOutput) -> Option<String> {
    strip_prefix_or_raw(&out.stdout, "py-spy ")
}

/// "rbspy 0.18.1" -> "0.18.1"
fn parse_rbspy(out: &ProbeOutput) -> Option<String> {
    strip_prefix_or_raw(&out.stdout, "rbspy ")
}

/// "perf version 6.16.0" -> "6.16.0"
fn parse_perf(out: &ProbeOutput) -> Option<String> {
    strip_prefix_or_raw(&out.stdout, "perf version ")
}

/// First whitespace-separated token; used for tools that print a bare
/// version number possibly followed by noise (nvm, rbenv)
fn parse_first_token(out: &ProbeOutput) -> Option<String> {
    out.stdout
        .split_whitespace()
        .next()
        .map(str::to_string)
        .or_else(|| nonempty(&out.stdout))
}

/// Already-clean single-value output (excimer, erlang OTP release, dotnet)
fn parse_trimmed(out: &ProbeOutput) -> Option<String> {
    nonempty(&out.stdout)
}

/// "PHP 8.2.10 (cli) (built: ...)" -> "8.2.10"
fn parse_php(out: &ProbeOutput) -> Option<String> {
    let line = out.stdout.lines().next().unwrap_or("");
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(_), Some(version)) => nonempty(version),
        _ => nonempty(&out.stdout),
    }
}

/// "Composer version 2.6.5 2023-10-06 10:11:52" -> "2.6.5"
fn parse_composer(out: &ProbeOutput) -> Option<String> {
    let tokens: Vec<&str> = out.stdout.split_whitespace().collect();
    if tokens.len() >= 3 && tokens[0] == "Composer" {
        nonempty(tokens[2])
    } else {
        nonempty(&out.stdout)
    }
}

/// "GNU objdump (GNU Binutils for Ubuntu) 2.38" -> "2.38"; the version is
/// the last dotted numeric token on the first line
fn parse_binutils(out: &ProbeOutput) -> Option<String> {
    let line = out.stdout.lines().next().unwrap_or("");
    for token in line.split_whitespace().rev() {
        if token.contains('.') && token.starts_with(|c: char| c.is_ascii_digit()) {
            return nonempty(token);
        }
    }
    nonempty(&out.stdout)
}

/// "Elixir 1.18.0 (compiled with Erlang/OTP 27)" -> "1.18.0"
fn parse_elixir(out: &ProbeOutput) -> Option<String> {
    let line = out.stdout.lines().next().unwrap_or("");
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() >= 2 && tokens[0] == "Elixir" {
        nonempty(tokens[1])
    } else {
        nonempty(&out.stdout)
    }
}

/// "rebar 3.25.0 on Erlang/OTP 27 Erts 14.1.1" -> "3.25.0"
fn parse_rebar3(out: &ProbeOutput) -> Option<String> {
    let tokens: Vec<&str> = out.stdout.split_whitespace().collect();
    if tokens.len() >= 2 && tokens[0] == "rebar" {
        nonempty(tokens[1])
    } else {
        nonempty(&out.stdout)
    }
}

/// java -version reports on stderr: `openjdk version "21.0.2" 2024-01-16 LTS`
/// -> "21.0.2", extracted as the first double-quoted token
fn parse_java(out: &ProbeOutput) -> Option<String> {
    let line = out.stderr.lines().next().unwrap_or("");
    if line.contains("version") {
        if let Some(start) = line.find('"') {
            if let Some(len) = line[start + 1..].find('"') {
                return nonempty(&line[start + 1..start + 1 + len]);
            }
        }
        return nonempty(line);
    }
    nonempty(&out.stdout).or_else(|| nonempty(&out.stderr))
}

/// "Apache Maven 3.9.11 (2be...)" -> "3.9.11"
fn parse_maven(out: &ProbeOutput) -> Option<String> {
    let line = out.stdout.lines().next().unwrap_or("");
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if line.contains("Apache Maven") && tokens.len() >= 3 {
        nonempty(tokens[2])
    } else {
        nonempty(&out.stdout)
    }
}

/// gradle --version prints a banner; the version is on the line starting
/// with "Gradle "
fn parse_gradle(out: &ProbeOutput) -> Option<String> {
    for line in out.stdout.lines() {
        if let Some(rest) = line.strip_prefix("Gradle ") {
            return nonempty(rest);
        }
    }
    nonempty(&out.stdout)
}

/// "Async-profiler 4.1 built on Jul 21 2025" -> "4.1"
fn parse_async_profiler(out: &ProbeOutput) -> Option<String> {
    if let Some(rest) = out.stdout.split("Async-profiler ").nth(1) {
        let version: String = rest
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let version = version.trim_end_matches('.');
        if version.contains('.') && version.starts_with(|c: char| c.is_ascii_digit()) {
            return nonempty(version);
        }
    }
    nonempty(&out.stdout)
}

/// dotnet-trace prints extra text around the version; take the first
/// x.y.z run of digits on the first line
fn parse_dotnet_trace(out: &ProbeOutput) -> Option<String> {
    let line = out.stdout.lines().next().unwrap_or("");
    find_dotted_version(line).or_else(|| nonempty(line))
}

/// First run of digits and dots with at least two dots, e.g. "3.1.141901"
fn find_dotted_version(line: &str) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let run: String = chars[start..i].iter().collect();
            let run = run.trim_end_matches('.');
            if run.matches('.').count() >= 2 {
                return Some(run.to_string());
            }
        } else {
            i += 1;
        }
    }
    None
}
