use std::fmt;

use crate::api::KerkPointClient;
use crate::display::{DisplayContext, Widget};
use crate::locale::Text;
use crate::projection::{active_goals, parse_date};
use crate::qr::{qr_for_link, QrCode, QrEncoder, QrOptions};

/// One active collection goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalRow {
    /// Goal name, or the localized "unknown goal".
    pub name: String,
    /// Payment link; may be empty.
    pub link: String,
    /// Expiry formatted for the locale, when the goal has one that parses.
    pub expiry: Option<String>,
    /// QR image for the link, when an encoder is available.
    pub qr: Option<QrCode>,
}

/// Active goals, soonest expiry first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalsView {
    /// Rows in display order.
    pub rows: Vec<GoalRow>,
    /// Fallback text for rows whose QR image is missing, per row.
    pub qr_markers: Vec<Option<String>>,
}

/// Render the collection goals widget.
pub async fn collection_goals(
    client: &KerkPointClient,
    ctx: &DisplayContext,
    encoder: Option<&dyn QrEncoder>,
) -> Widget<GoalsView> {
    let goals = match client.collection_goals().await {
        Ok(goals) => goals,
        Err(e) => return Widget::Failed(ctx.failure_message(&e, Text::GoalsUnavailable)),
    };

    let rows: Vec<GoalRow> = active_goals(goals, ctx.now)
        .into_iter()
        .map(|goal| {
            let link = goal.payment_request.clone().unwrap_or_default();
            let expiry = goal.payment_request_expiry.as_deref()
                .and_then(parse_date)
                .map(|when| when.format(&format!("{} %H:%M", ctx.locale.date_format())).to_string());
            GoalRow {
                name: goal.name.as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .unwrap_or(ctx.text(Text::UnknownGoal))
                    .to_string(),
                qr: encoder.map(|enc| qr_for_link(enc, &link, QrOptions::default())),
                link,
                expiry,
            }
        })
        .collect();

    if rows.is_empty() {
        return Widget::Empty(ctx.text(Text::NoGoals).to_string());
    }

    let qr_markers = rows.iter()
        .map(|row| row.qr.as_ref().and_then(|qr| qr.marker(ctx.locale)))
        .collect();
    Widget::Ready(GoalsView { rows, qr_markers })
}

impl fmt::Display for GoalsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, marker) in self.rows.iter().zip(&self.qr_markers) {
            write!(f, "{}", row.name)?;
            if let Some(expiry) = &row.expiry {
                write!(f, " ({expiry})")?;
            }
            writeln!(f)?;
            if !row.link.is_empty() {
                writeln!(f, "  {}", row.link)?;
            }
            if let Some(marker) = marker {
                writeln!(f, "  {marker}")?;
            }
        }
        Ok(())
    }
}
