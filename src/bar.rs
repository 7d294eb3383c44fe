//! The `imap` bar item.

use time::OffsetDateTime;

use crate::client::{ClientError, Credentials, UnreadSource};
use crate::config::Config;
use crate::palette::Palette;

/// Bar item text together with the time it was produced.
///
/// The server is asked at most once per configured interval, in between the
/// last text is handed out again.
#[derive(Debug, Default)]
pub struct BarItem {
    last_run: Option<OffsetDateTime>,
    last_message: String,
}

impl BarItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Produce the bar item text for `now`, connecting via `connect` when the
    /// cached text is older than the interval.
    ///
    /// A failed connect is not remembered as a run, so the next call retries.
    pub fn render<S, C>(
        &mut self,
        config: &Config,
        palette: Palette,
        now: OffsetDateTime,
        connect: C,
    ) -> &str
    where
        S: UnreadSource,
        C: FnOnce(&Credentials) -> Result<S, ClientError>,
    {
        if let Some(last_run) = self.last_run {
            let interval =
                time::Duration::try_from(config.interval()).unwrap_or(time::Duration::MAX);
            if now - last_run < interval {
                return &self.last_message;
            }
        }

        let mut source = match Credentials::from_config(config) {
            Some(credentials) => match connect(&credentials) {
                Ok(source) => Some(source),
                Err(err) => {
                    log::error!("IMAP connection failed: {}", err);
                    self.last_message.clear();
                    return &self.last_message;
                }
            },
            None => None,
        };

        let mut output = String::new();
        if !config.message.is_empty() {
            output.push_str(&format!(
                "{}{}: ",
                palette.color(&config.message_color),
                config.message
            ));
        }

        let mut any_with_unread = false;
        for mailbox in config.mailbox_names() {
            let unread = match source.as_mut() {
                Some(source) => source.unread_count(mailbox).unwrap_or_else(|err| {
                    log::warn!("{}", err);
                    0
                }),
                None => {
                    log::warn!("Problem with IMAP connection. Please check settings.");
                    0
                }
            };

            if unread > 0 {
                any_with_unread = true;
                output.push_str(&format!(
                    "{}{}: {}{} ",
                    palette.color(&config.message_color),
                    mailbox,
                    palette.color(&config.count_color),
                    unread
                ));
            }
        }

        if let Some(source) = source.as_mut() {
            source.logout();
        }

        output.pop();
        output.push_str(&palette.reset());

        self.last_run = Some(now);
        self.last_message = if any_with_unread { output } else { String::new() };
        &self.last_message
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use time::macros::datetime;

    use super::*;
    use crate::config::Password;

    struct FakeSource {
        counts: HashMap<&'static str, u32>,
        logged_out: Rc<Cell<bool>>,
    }

    impl FakeSource {
        fn new(counts: &[(&'static str, u32)]) -> Self {
            Self {
                counts: counts.iter().copied().collect(),
                logged_out: Rc::new(Cell::new(false)),
            }
        }
    }

    impl UnreadSource for FakeSource {
        fn unread_count(&mut self, mailbox: &str) -> Result<u32, ClientError> {
            assert!(!self.logged_out.get(), "queried after logout");
            self.counts
                .get(mailbox)
                .copied()
                .ok_or_else(|| ClientError::Status {
                    mailbox: mailbox.to_string(),
                    source: imap::error::Error::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "no such mailbox",
                    )),
                })
        }

        fn logout(&mut self) {
            self.logged_out.set(true);
        }
    }

    fn config() -> Config {
        Config {
            username: "me@example.com".to_string(),
            password: Password::new("secret"),
            hostname: "imap.example.com".to_string(),
            mailboxes: "INBOX, Work, Lists".to_string(),
            ..Config::default()
        }
    }

    fn refused() -> ClientError {
        ClientError::Connect {
            host: "imap.example.com".to_string(),
            port: 993,
            source: imap::error::Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            )),
        }
    }

    #[test]
    fn lists_only_mailboxes_with_unread_mail() {
        let mut item = BarItem::new();
        let text = item.render(
            &config(),
            Palette::Plain,
            datetime!(2024-01-01 12:00 UTC),
            |_| Ok(FakeSource::new(&[("INBOX", 3), ("Work", 0), ("Lists", 12)])),
        );
        assert_eq!(text, "Mail: INBOX: 3 Lists: 12");
    }

    #[test]
    fn empty_when_nothing_is_unread() {
        let mut item = BarItem::new();
        let text = item.render(
            &config(),
            Palette::Ansi,
            datetime!(2024-01-01 12:00 UTC),
            |_| Ok(FakeSource::new(&[("INBOX", 0), ("Work", 0), ("Lists", 0)])),
        );
        assert_eq!(text, "");
    }

    #[test]
    fn colors_wrap_labels_and_counts() {
        let config = Config {
            mailboxes: "INBOX".to_string(),
            message_color: "green".to_string(),
            count_color: "red".to_string(),
            ..config()
        };
        let mut item = BarItem::new();
        let text = item.render(
            &config,
            Palette::Ansi,
            datetime!(2024-01-01 12:00 UTC),
            |_| Ok(FakeSource::new(&[("INBOX", 7)])),
        );
        assert_eq!(
            text,
            "\x1b[32mMail: \x1b[32mINBOX: \x1b[31m7\x1b[0m"
        );
    }

    #[test]
    fn empty_message_drops_the_label() {
        let config = Config {
            message: String::new(),
            ..config()
        };
        let mut item = BarItem::new();
        let text = item.render(
            &config,
            Palette::Tmux,
            datetime!(2024-01-01 12:00 UTC),
            |_| Ok(FakeSource::new(&[("INBOX", 1), ("Work", 2), ("Lists", 0)])),
        );
        assert_eq!(
            text,
            "#[fg=default]INBOX: #[fg=default]1 #[fg=default]Work: #[fg=default]2#[default]"
        );
    }

    #[test]
    fn cached_within_interval() {
        let connects = Cell::new(0);
        let connect = |_: &Credentials| -> Result<FakeSource, ClientError> {
            connects.set(connects.get() + 1);
            Ok(FakeSource::new(&[("INBOX", 1), ("Work", 0), ("Lists", 0)]))
        };

        let mut item = BarItem::new();
        let config = config();
        item.render(&config, Palette::Plain, datetime!(2024-01-01 12:00 UTC), connect);
        let text = item
            .render(&config, Palette::Plain, datetime!(2024-01-01 12:04:59 UTC), connect)
            .to_string();
        assert_eq!(connects.get(), 1);
        assert_eq!(text, "Mail: INBOX: 1");

        item.render(&config, Palette::Plain, datetime!(2024-01-01 12:05 UTC), connect);
        assert_eq!(connects.get(), 2);
    }

    #[test]
    fn failing_mailbox_counts_as_zero() {
        let mut item = BarItem::new();
        let text = item.render(
            &config(),
            Palette::Plain,
            datetime!(2024-01-01 12:00 UTC),
            |_| Ok(FakeSource::new(&[("INBOX", 2)])),
        );
        assert_eq!(text, "Mail: INBOX: 2");
    }

    #[test]
    fn missing_settings_skip_connecting() {
        let mut item = BarItem::new();
        let text = item.render(
            &Config::default(),
            Palette::Plain,
            datetime!(2024-01-01 12:00 UTC),
            |_| -> Result<FakeSource, ClientError> { panic!("must not connect") },
        );
        assert_eq!(text, "");

        // Still counts as a run.
        item.render(
            &Config::default(),
            Palette::Plain,
            datetime!(2024-01-01 12:01 UTC),
            |_| -> Result<FakeSource, ClientError> { panic!("must not connect") },
        );
    }

    #[test]
    fn connect_failure_retries_on_next_call() {
        let mut item = BarItem::new();
        let config = config();
        item.render(
            &config,
            Palette::Plain,
            datetime!(2024-01-01 12:00 UTC),
            |_| -> Result<FakeSource, ClientError> { Err(refused()) },
        );
        assert_eq!(item.last_message(), "");

        let text = item.render(
            &config,
            Palette::Plain,
            datetime!(2024-01-01 12:01 UTC),
            |_| Ok(FakeSource::new(&[("Work", 4)])),
        );
        assert_eq!(text, "Mail: Work: 4");
    }

    #[test]
    fn credentials_are_evaluated_before_connecting() {
        let config = Config {
            port: 1993,
            ..config()
        };
        let mut item = BarItem::new();
        item.render(
            &config,
            Palette::Plain,
            datetime!(2024-01-01 12:00 UTC),
            |credentials| {
                assert_eq!(credentials.hostname, "imap.example.com");
                assert_eq!(credentials.port, 1993);
                Ok(FakeSource::new(&[]))
            },
        );
    }

    #[test]
    fn logs_out_after_querying() {
        let source = FakeSource::new(&[("INBOX", 1)]);
        let logged_out = Rc::clone(&source.logged_out);

        let mut item = BarItem::new();
        item.render(
            &config(),
            Palette::Plain,
            datetime!(2024-01-01 12:00 UTC),
            move |_| Ok(source),
        );
        assert!(logged_out.get());
    }
}
