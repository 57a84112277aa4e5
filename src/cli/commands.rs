use std::fs;
use std::sync::Arc;

use crate::app::{AppContext, MailvaneError, Result};
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::poller::{Poller, PollerConfig};
use crate::sink::FileSink;
use crate::watch::{WatchCallback, WatchRule};

/// Assemble an [`AppContext`] from the configuration: fetcher credentials,
/// watch rules in file order, and the durable file sink when an output root
/// is configured.
pub fn build_context(config: &Config) -> Result<Arc<AppContext>> {
    if config.feed.url.is_empty() {
        return Err(MailvaneError::Config(
            "feed.url is not set; edit the config file first".to_string(),
        ));
    }
    url::Url::parse(&config.feed.url)?;

    let basic_auth = match (&config.feed.username, &config.feed.password) {
        (Some(user), Some(password)) => Some((user.clone(), password.clone())),
        _ => None,
    };
    let fetcher = HttpFetcher::with_auth(config.feed.cookie.clone(), basic_auth);

    let ctx = Arc::new(AppContext::with_fetcher(
        &config.feed.url,
        Arc::new(fetcher),
    ));

    for watch in &config.watch {
        let rule = match &watch.command {
            Some(command) => WatchRule::with_callback(&watch.pattern, shell_callback(command))?,
            None => WatchRule::new(&watch.pattern)?,
        };
        ctx.add_watch(rule);
    }

    if let Some(root) = &config.output.root {
        ctx.register_sink(Arc::new(FileSink::new(root.clone())));
    }

    Ok(ctx)
}

/// A watch callback that spawns `command` through `sh -c`, detached.
///
/// Watch callbacks fire on every matching poll, so the command must
/// tolerate repeated invocation. The child is reaped from a background
/// thread; its exit status is not inspected.
fn shell_callback(command: &str) -> WatchCallback {
    let command = command.to_string();
    Box::new(move || {
        let mut child = std::process::Command::new("sh")
            .arg("-c")
            .arg(&command)
            .spawn()?;
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    })
}

pub async fn poll_once(ctx: &AppContext) -> Result<()> {
    let summary = ctx.run_cycle().await?;

    println!("{} unread", summary.unread_count);
    if !summary.formatted.is_empty() {
        print!("{}", summary.formatted);
    }
    if summary.any_matched {
        println!("Watched senders:");
        print!("{}", ctx.status().help_text);
    }

    Ok(())
}

pub async fn run_loop(ctx: Arc<AppContext>, min_interval_secs: u64) -> Result<()> {
    let poller = Poller::new(ctx, PollerConfig { min_interval_secs });
    poller.run().await;
    Ok(())
}

/// Print the durable sink's last persisted state.
pub fn show_status(config: &Config) -> Result<()> {
    let root = config.output.root.as_ref().ok_or_else(|| {
        MailvaneError::Config("output.root is not set; nothing is persisted".to_string())
    })?;

    let sink = FileSink::new(root.clone());

    let count = fs::read_to_string(sink.count_path()).unwrap_or_default();
    let count = count.trim();
    if count.is_empty() {
        println!("0 unread");
    } else {
        println!("{} unread", count);
    }

    let headers = fs::read_to_string(sink.headers_path()).unwrap_or_default();
    if !headers.is_empty() {
        print!("{}", headers);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatchConfig;

    fn config_with_url() -> Config {
        let mut config = Config::default();
        config.feed.url = "https://mail.example.com/feed/atom".to_string();
        config
    }

    #[test]
    fn test_build_context_requires_feed_url() {
        let err = build_context(&Config::default()).unwrap_err();
        assert!(matches!(err, MailvaneError::Config(_)));
    }

    #[test]
    fn test_build_context_rejects_invalid_pattern() {
        let mut config = config_with_url();
        config.watch.push(WatchConfig {
            pattern: "[unclosed".to_string(),
            command: None,
        });

        let err = build_context(&config).unwrap_err();
        assert!(matches!(err, MailvaneError::Pattern(_)));
    }

    #[test]
    fn test_build_context_wires_feed_url() {
        let mut config = config_with_url();
        config.watch.push(WatchConfig {
            pattern: "Boss".to_string(),
            command: None,
        });

        let ctx = build_context(&config).unwrap();
        assert_eq!(ctx.feed_url(), "https://mail.example.com/feed/atom");
    }
}
