use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod animation;
pub mod color;
pub mod export;
pub mod health;
pub mod mesh;
pub mod render;
pub mod validation;

fn format_timestamp(time: OffsetDateTime) -> String {
    time.format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
