use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

/// Open `url` with the configured command, or the platform's default opener.
///
/// The child is detached from the terminal so it cannot draw over the UI.
pub fn open(command: Option<&str>, url: &str) -> Result<()> {
    let mut cmd = build_command(command, url)?;
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let program = format!("{:?}", cmd.get_program());
    cmd.spawn()
        .with_context(|| format!("browser {} not found or failed to launch", program))?;
    tracing::info!(%url, "opened test source");
    Ok(())
}

/// Put `url` on the system clipboard.
pub fn copy(url: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
    clipboard
        .set_text(url.to_string())
        .context("failed to copy link")?;
    Ok(())
}

fn build_command(command: Option<&str>, url: &str) -> Result<Command> {
    let mut parts = match command {
        Some(line) => shell_words::split(line).context("invalid browser command")?,
        None => default_opener(),
    };
    if parts.is_empty() {
        bail!("browser command is empty");
    }

    let program = parts.remove(0);
    let mut cmd = Command::new(program);
    cmd.args(parts).arg(url);
    Ok(cmd)
}

fn default_opener() -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["open".into()]
    } else if cfg!(windows) {
        // The empty argument is the window title `start` expects.
        vec!["cmd".into(), "/C".into(), "start".into(), "".into()]
    } else {
        vec!["xdg-open".into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://github.com/tc39/test262/blob/main/test/language/a.js";

    fn argv(cmd: &Command) -> Vec<String> {
        std::iter::once(cmd.get_program())
            .chain(cmd.get_args())
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn configured_command_is_split_and_gets_the_url() {
        let cmd = build_command(Some("firefox --new-tab"), URL).unwrap();
        assert_eq!(argv(&cmd), vec!["firefox", "--new-tab", URL]);
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let cmd = build_command(Some("'/opt/my browser/bin' -p 'work profile'"), URL).unwrap();
        assert_eq!(
            argv(&cmd),
            vec!["/opt/my browser/bin", "-p", "work profile", URL]
        );
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(build_command(Some("   "), URL).is_err());
        assert!(build_command(Some("'unterminated"), URL).is_err());
    }

    #[test]
    fn default_opener_receives_the_url() {
        let cmd = build_command(None, URL).unwrap();
        assert_eq!(argv(&cmd).last().map(String::as_str), Some(URL));
    }
}
