use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

use super::{ProfileScanner, ProviderError};
use crate::config::SherlockConfig;
use crate::types::*;

static FOUND_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\+\] ([^:]+): (.+)").expect("found-line pattern is valid"));

const FOUND_MARKER: &str = "[+]";

/// Runs the Sherlock CLI as a supervised child process.
pub struct SherlockScanner {
    program: String,
    args: Vec<String>,
    site_timeout_secs: u64,
    process_timeout: Duration,
}

impl SherlockScanner {
    pub fn new(config: &SherlockConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            site_timeout_secs: config.site_timeout_secs,
            process_timeout: config.process_timeout,
        }
    }

    fn command(&self, username: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--timeout")
            .arg(self.site_timeout_secs.to_string())
            // usernames like "--help" must stay positional
            .arg("--")
            .arg(username)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ProfileScanner for SherlockScanner {
    async fn scan(&self, username: &str) -> Result<ScanOutput, ProviderError> {
        debug!(
            program = %self.program,
            args = ?self.args,
            username,
            "Executing Sherlock command"
        );

        let mut child = self.command(username).spawn()?;
        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();

        let outcome = tokio::time::timeout(self.process_timeout, async {
            tokio::try_join!(drain(stdout.as_mut()), drain(stderr.as_mut()), child.wait())
        })
        .await;

        match outcome {
            Ok(Ok((stdout, stderr, status))) => Ok(ScanOutput {
                success: status.success(),
                stdout,
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            }),
            Ok(Err(e)) => Err(ProviderError::Io(e)),
            Err(_) => {
                // kill() also waits for the child, so no zombie is left behind
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill timed out Sherlock process");
                }
                Err(ProviderError::Timeout)
            }
        }
    }
}

async fn drain<R: AsyncRead + Unpin>(reader: Option<&mut R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Extracts found profiles from Sherlock's text report, in report order.
///
/// Only lines starting with `[+]` are considered; those that don't match
/// `[+] <site>: <url>` are skipped.
pub fn parse_found_profiles(output: &str) -> Vec<ProfileRecord> {
    output
        .lines()
        .filter(|line| line.trim().starts_with(FOUND_MARKER))
        .filter_map(|line| {
            let caps = FOUND_LINE.captures(line)?;
            let site = caps[1].trim();
            let url = caps[2].trim();
            Some(ProfileRecord::found(site, url))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_found_and_not_found_lines() {
        let output = "[*] Checking username x on:\n\
                      [+] GitHub: https://github.com/x\n\
                      [-] Twitter: Not Found!\n";

        let records = parse_found_profiles(output);

        assert_eq!(records, vec![ProfileRecord::found("GitHub", "https://github.com/x")]);
        assert_eq!(records[0].status, ProfileStatus::Found);
    }

    #[test]
    fn test_parse_keeps_report_order() {
        let output = "  [+] Reddit: https://www.reddit.com/user/x\n\
                      [+] GitLab: https://gitlab.com/x\n\
                      [+] Docker Hub: https://hub.docker.com/u/x/\n";

        let sites: Vec<_> = parse_found_profiles(output)
            .into_iter()
            .map(|r| r.site)
            .collect();

        assert_eq!(sites, vec!["Reddit", "GitLab", "Docker Hub"]);
    }

    #[test]
    fn test_parse_url_keeps_its_colons() {
        let records = parse_found_profiles("[+] Mastodon: https://mastodon.social:443/@x");
        assert_eq!(records[0].site, "Mastodon");
        assert_eq!(records[0].url, "https://mastodon.social:443/@x");
    }

    #[test]
    fn test_parse_skips_malformed_found_lines() {
        let output = "[+] no separator here\n[+]\n[+] Keybase: https://keybase.io/x\n";
        let records = parse_found_profiles(output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].site, "Keybase");
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_found_profiles("").is_empty());
        assert!(parse_found_profiles("[*] Search completed with 0 results\n").is_empty());
    }

    #[cfg(unix)]
    fn script_scanner(script: &str, timeout: Duration) -> SherlockScanner {
        SherlockScanner::new(&SherlockConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "sherlock".to_string()],
            site_timeout_secs: 10,
            process_timeout: timeout,
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scan_passes_username_and_site_timeout() {
        let scanner = script_scanner(
            r#"printf '[+] GitHub: https://github.com/%s\n' "$4"; echo "args: $1 $2 $3""#,
            Duration::from_secs(5),
        );

        let output = scanner.scan("octocat").await.unwrap();
        let stdout = String::from_utf8(output.stdout).unwrap();

        assert!(output.success);
        assert!(stdout.contains("[+] GitHub: https://github.com/octocat"));
        assert!(stdout.contains("args: --timeout 10 --"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scan_keeps_dash_username_positional() {
        let scanner = script_scanner(r#"echo "$3|$4|$#""#, Duration::from_secs(5));

        let output = scanner.scan("--help").await.unwrap();
        let stdout = String::from_utf8(output.stdout).unwrap();

        assert_eq!(stdout.trim(), "--|--help|4");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scan_reports_non_zero_exit() {
        let scanner = script_scanner("echo 'site unreachable' >&2; exit 3", Duration::from_secs(5));

        let output = scanner.scan("x").await.unwrap();

        assert!(!output.success);
        assert_eq!(output.stderr.trim(), "site unreachable");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_scan_timeout_kills_process() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());
        let scanner = script_scanner(&script, Duration::from_millis(500));

        let result = scanner.scan("x").await;

        assert!(matches!(result, Err(ProviderError::Timeout)));
        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let proc_path = format!("/proc/{}", pid.trim());
        assert!(!std::path::Path::new(&proc_path).exists(), "process {} still alive", pid.trim());
    }

    #[tokio::test]
    async fn test_scan_missing_program_is_io_error() {
        let scanner = SherlockScanner::new(&SherlockConfig {
            program: "definitely-not-a-sherlock-binary".to_string(),
            args: vec![],
            ..SherlockConfig::default()
        });

        let result = scanner.scan("x").await;

        assert!(matches!(result, Err(ProviderError::Io(_))));
    }
}
