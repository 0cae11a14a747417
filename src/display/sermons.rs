use std::fmt;

use crate::display::{DisplayContext, Widget};
use crate::feed::{FeedSource, SermonItem};
use crate::locale::Text;

/// Latest recordings with fallbacks filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SermonsView {
    /// Items in feed order; `author` and `description` are always set.
    pub items: Vec<SermonItem>,
    /// Publication dates formatted for the locale, per item.
    pub dates: Vec<Option<String>>,
}

/// Render the latest sermons of a playlist.
///
/// A feed that fails or has no items renders as empty; the failure is
/// only logged.
pub async fn latest_sermons(
    source: &dyn FeedSource,
    ctx: &DisplayContext,
    playlist_id: &str,
    max_items: usize,
) -> Widget<SermonsView> {
    let items = match source.latest(playlist_id, max_items).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Sermon feed for playlist {playlist_id} unavailable: {e}");
            Vec::new()
        }
    };
    if items.is_empty() {
        return Widget::Empty(ctx.text(Text::NoSermons).to_string());
    }

    let dates = items.iter()
        .map(|item| item.published.map(|at| at.format(ctx.locale.date_format()).to_string()))
        .collect();
    let items = items.into_iter()
        .map(|item| SermonItem {
            author: item.author.or_else(|| Some(ctx.text(Text::Unknown).to_string())),
            description: item.description.or_else(|| Some(ctx.text(Text::NoDescription).to_string())),
            ..item
        })
        .collect();

    Widget::Ready(SermonsView { items, dates })
}

impl fmt::Display for SermonsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (item, date) in self.items.iter().zip(&self.dates) {
            writeln!(f, "{}", item.title)?;
            writeln!(
                f,
                "  {} | {}",
                item.author.as_deref().unwrap_or_default(),
                date.as_deref().unwrap_or_default()
            )?;
            if let Some(link) = &item.permalink {
                writeln!(f, "  {link}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::display::testing::at;
    use crate::display::Audience;
    use crate::error::{Error, Result};
    use crate::locale::Locale;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    struct FixedFeed {
        items: Result<Vec<SermonItem>>,
        requested: Mutex<Vec<(String, usize)>>,
    }

    impl FixedFeed {
        fn new(items: Result<Vec<SermonItem>>) -> Self {
            Self { items, requested: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl FeedSource for FixedFeed {
        async fn latest(&self, playlist_id: &str, max_items: usize) -> Result<Vec<SermonItem>> {
            self.requested.lock().unwrap().push((playlist_id.to_string(), max_items));
            match &self.items {
                Ok(items) => Ok(items.iter().take(max_items).cloned().collect()),
                Err(e) => Err(Error::Feed(e.to_string())),
            }
        }
    }

    fn ctx() -> DisplayContext {
        DisplayContext::new(Audience::Visitor, Locale::Nl, at(2024, 6, 3, 9))
    }

    #[tokio::test]
    async fn fills_fallbacks() {
        let feed = FixedFeed::new(Ok(vec![
            SermonItem {
                title: "Ochtenddienst".into(),
                published: Some(Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap()),
                author: Some("Ds. A. de Vries".into()),
                ..SermonItem::default()
            },
            SermonItem { title: "Avonddienst".into(), ..SermonItem::default() },
        ]));

        let widget = latest_sermons(&feed, &ctx(), "246", 10).await;
        let view = widget.ready().expect("sermons");

        assert_eq!(view.items[0].author.as_deref(), Some("Ds. A. de Vries"));
        assert_eq!(view.dates[0].as_deref(), Some("02-06-2024"));
        assert_eq!(view.items[1].author.as_deref(), Some("Onbekend"));
        assert_eq!(view.items[1].description.as_deref(), Some("Geen details beschikbaar."));
        assert_eq!(view.dates[1], None);
        assert_eq!(feed.requested.lock().unwrap().as_slice(), [("246".to_string(), 10)]);
    }

    #[tokio::test]
    async fn failure_and_empty_feed_render_empty() {
        let broken = FixedFeed::new(Err(Error::Feed("timeout".into())));
        let widget = latest_sermons(&broken, &ctx(), "246", 10).await;
        assert_eq!(widget, Widget::Empty("Er zijn geen kerkdiensten gevonden.".into()));

        let empty = FixedFeed::new(Ok(Vec::new()));
        assert!(matches!(latest_sermons(&empty, &ctx(), "7", 3).await, Widget::Empty(_)));
    }
}
