//! Markup template rendering.
//!
//! Fills one of the two layout templates with a campaign payload. The
//! templates ship inside the crate and can be replaced per deployment by
//! files of the same name in a templates directory.

use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tera::{Context, Tera};

use promokit_campaign_model::payload::{CampaignPayload, CourseEntry};
use promokit_campaign_model::variant::TemplateId;
use promokit_common::error::{RenderError, RenderResult};

const COMMUNITY_TEMPLATE: &str = include_str!("../templates/community_template.html");
const CHANNEL_ART_TEMPLATE: &str = include_str!("../templates/yt_template.html");

/// Markup of the additional-discount element, present only for
/// flat + additional campaigns.
pub const ADDITIONAL_DISCOUNT_MARKER: &str = r#"class="additional-discount""#;

/// Markup of the expiry notice element, present only on expiry variants.
pub const EXPIRY_NOTICE_MARKER: &str = r#"class="expiry-notice""#;

/// Template context, exposed to templates as `data`.
#[derive(Debug, Serialize)]
struct TemplateData<'a> {
    discount_type: &'static str,
    flat_val: &'a str,
    add_val: Option<&'a str>,
    has_additional: bool,
    coupon_code: &'a str,
    validity_text: String,
    expiry_text: &'a str,
    use_expiry: bool,
    courses: Vec<CourseData<'a>>,
}

#[derive(Debug, Serialize)]
struct CourseData<'a> {
    exam: &'a str,
    stream: &'a str,
    subject: &'a str,
    offerings: &'a [String],
    offerings_text: String,
}

impl<'a> CourseData<'a> {
    fn from_entry(entry: &'a CourseEntry) -> Self {
        Self {
            exam: &entry.exam,
            stream: &entry.stream,
            subject: &entry.subject,
            offerings: &entry.offerings,
            offerings_text: entry.offerings_text(),
        }
    }
}

impl<'a> TemplateData<'a> {
    fn new(payload: &'a CampaignPayload, use_expiry: bool) -> Self {
        let additional = payload.discount.additional_value();
        Self {
            discount_type: payload.discount.label(),
            flat_val: payload.discount.flat_value(),
            add_val: additional,
            has_additional: additional.is_some(),
            coupon_code: &payload.coupon_code,
            validity_text: payload.validity_text(),
            expiry_text: &payload.expiry_text,
            use_expiry,
            courses: payload.courses.iter().map(CourseData::from_entry).collect(),
        }
    }
}

/// Renders campaign payloads into markup documents.
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Renderer backed by the templates compiled into the crate.
    pub fn builtin() -> RenderResult<Self> {
        let mut tera = raw_engine();
        for id in TemplateId::ALL {
            register(&mut tera, id.file_name(), builtin_source(id))?;
        }
        Ok(Self { tera })
    }

    /// Renderer preferring templates found in `dir`.
    ///
    /// A template file absent from `dir` falls back to the built-in one.
    pub fn from_dir(dir: &Path) -> RenderResult<Self> {
        let mut tera = raw_engine();
        for id in TemplateId::ALL {
            let path = dir.join(id.file_name());
            if path.is_file() {
                let source = std::fs::read_to_string(&path).map_err(|e| RenderError::Engine {
                    template: id.file_name().to_string(),
                    message: format!("cannot read {}: {e}", path.display()),
                })?;
                tracing::debug!(template = %id, path = %path.display(), "Using template override");
                register(&mut tera, id.file_name(), &source)?;
            } else {
                register(&mut tera, id.file_name(), builtin_source(id))?;
            }
        }
        Ok(Self { tera })
    }

    /// Renderer for an optional override directory.
    pub fn load(templates_dir: Option<&Path>) -> RenderResult<Self> {
        match templates_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }

    /// Render `template` for one variant.
    pub fn render(
        &self,
        template: TemplateId,
        payload: &CampaignPayload,
        use_expiry: bool,
    ) -> RenderResult<String> {
        payload.validate()?;

        let name = template.file_name();
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(RenderError::UnknownTemplate {
                name: name.to_string(),
            });
        }

        let mut context = Context::new();
        context.insert("data", &TemplateData::new(payload, use_expiry));

        let markup = self
            .tera
            .render(name, &context)
            .map_err(|e| classify_tera_error(name, &e))?;

        tracing::debug!(
            template = name,
            use_expiry,
            bytes = markup.len(),
            "Rendered markup"
        );
        Ok(markup)
    }

    /// Render a template given by file name.
    pub fn render_named(
        &self,
        name: &str,
        payload: &CampaignPayload,
        use_expiry: bool,
    ) -> RenderResult<String> {
        self.render(TemplateId::from_str(name)?, payload, use_expiry)
    }
}

/// Values are inserted verbatim; catalog labels such as `APFC & EO/AO` must
/// reach the page unescaped.
fn raw_engine() -> Tera {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera
}

fn builtin_source(id: TemplateId) -> &'static str {
    match id {
        TemplateId::Community => COMMUNITY_TEMPLATE,
        TemplateId::ChannelArt => CHANNEL_ART_TEMPLATE,
    }
}

fn register(tera: &mut Tera, name: &str, source: &str) -> RenderResult<()> {
    tera.add_raw_template(name, source)
        .map_err(|e| RenderError::Engine {
            template: name.to_string(),
            message: error_chain(&e),
        })
}

/// Flatten a tera error and its sources into one line.
fn error_chain(err: &tera::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

fn classify_tera_error(template: &str, err: &tera::Error) -> RenderError {
    let message = error_chain(err);
    match missing_variable(&message) {
        Some(field) => RenderError::MissingField {
            template: template.to_string(),
            field,
        },
        None => RenderError::Engine {
            template: template.to_string(),
            message,
        },
    }
}

/// Extract `name` from tera's "Variable `name` not found in context" text.
fn missing_variable(message: &str) -> Option<String> {
    let idx = message.find("not found in context")?;
    let head = &message[..idx];
    let end = head.rfind('`')?;
    let start = head[..end].rfind('`')?;
    Some(head[start + 1..end].to_string())
}
