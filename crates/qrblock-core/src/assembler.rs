//! Presentation assembly.
//!
//! Turns a resolved [`DisplayPayload`] into the record the `block_qr/qr`
//! template consumes: the payload fields plus the edit-mode flag, the
//! short-link rewrite, the JSON-encoded content for the client renderer, the
//! display size, the panel id and the client script location.

use serde::Serialize;
use tracing::debug;
use url::form_urlencoded;

use crate::config::{BlockConfiguration, Settings};
use crate::context::RequestContext;
use crate::dispatch::{resolve, Collaborators};
use crate::error::{QrBlockError, Result};
use crate::payload::DisplayPayload;
use crate::urls::UrlBuilder;

/// Token in the short-link template replaced by the encoded link.
pub const SHORTLINK_TOKEN: &str = "SHORTLINK";

/// Template the assembled record is rendered with.
pub const TEMPLATE_NAME: &str = "block_qr/qr";

/// Presentation options shared by every block on the site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationSettings {
    /// Short-link service template, `None` when short links are off.
    pub short_link_template: Option<String>,
    /// Absolute URL of the client QR renderer script.
    pub client_script_url: String,
}

impl PresentationSettings {
    /// Derives presentation options from process settings.
    ///
    /// An empty short-link template counts as unset.
    #[must_use]
    pub fn from_settings(settings: &Settings, urls: &UrlBuilder) -> Self {
        Self {
            short_link_template: settings
                .presentation
                .short_link_template
                .clone()
                .filter(|template| !template.trim().is_empty()),
            client_script_url: urls
                .resolve(&settings.presentation.client_script_path)
                .to_string(),
        }
    }
}

/// Per-instance view parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockView {
    /// Identifier of the block panel on the page.
    pub panel_id: i64,
    /// Display size of the code in pixels.
    pub size: Option<u32>,
}

impl BlockView {
    /// View for a panel with the default size.
    #[must_use]
    pub const fn new(panel_id: i64) -> Self {
        Self {
            panel_id,
            size: None,
        }
    }

    /// Sets the display size.
    #[must_use]
    pub const fn with_size(mut self, size: Option<u32>) -> Self {
        self.size = size;
        self
    }
}

/// The merged record handed to the template renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateData {
    /// Resolved payload, flattened into the record.
    #[serde(flatten)]
    pub payload: DisplayPayload,
    /// Whether the viewer is editing the page.
    pub fullview: bool,
    /// Configured short-link template.
    pub configshortlink: Option<String>,
    /// Short link for the encoded URL.
    pub urlshort: Option<String>,
    /// `qrcodecontent` as a JSON string literal for the client renderer.
    pub qrcodecontent_json: String,
    /// Display size in pixels.
    pub size: Option<u32>,
    /// Block panel id.
    pub id: i64,
    /// Client QR renderer script.
    pub javascript: String,
}

/// Substitutes the form-encoded `link` for [`SHORTLINK_TOKEN`] in `template`.
///
/// Only ASCII alphanumerics and `-._` stay literal; `*` is escaped as well.
#[must_use]
pub fn short_link(template: &str, link: &str) -> String {
    let encoded = form_urlencoded::byte_serialize(link.as_bytes())
        .collect::<String>()
        .replace('*', "%2A");
    template.replace(SHORTLINK_TOKEN, &encoded)
}

/// Adds the cross-cutting presentation fields to a payload.
#[must_use]
pub fn assemble(
    payload: DisplayPayload,
    ctx: &RequestContext,
    view: BlockView,
    settings: &PresentationSettings,
) -> TemplateData {
    let urlshort = match (&settings.short_link_template, payload.qr_link()) {
        (Some(template), Some(link)) => Some(short_link(template, link)),
        _ => None,
    };
    // A JSON string literal; serde_json never escapes '/'.
    let qrcodecontent_json = serde_json::Value::from(payload.qr_content()).to_string();

    TemplateData {
        payload,
        fullview: ctx.editing,
        configshortlink: settings.short_link_template.clone(),
        urlshort,
        qrcodecontent_json,
        size: view.size,
        id: view.panel_id,
        javascript: settings.client_script_url.clone(),
    }
}

/// Produces final markup from the assembled record.
pub trait TemplateRenderer {
    /// Renders `data` with the named template.
    ///
    /// # Errors
    ///
    /// Returns [`QrBlockError::RenderFailed`] if the template cannot be rendered.
    fn render(&self, template: &str, data: &TemplateData) -> Result<String>;
}

/// Renders the record as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl TemplateRenderer for JsonRenderer {
    fn render(&self, _template: &str, data: &TemplateData) -> Result<String> {
        serde_json::to_string_pretty(data).map_err(|e| QrBlockError::RenderFailed(e.to_string()))
    }
}

/// One block instance bound to its collaborators.
#[derive(Debug, Clone, Copy)]
pub struct QrBlock<'a> {
    env: Collaborators<'a>,
    presentation: &'a PresentationSettings,
}

impl<'a> QrBlock<'a> {
    /// Binds the block to its collaborators and presentation options.
    #[must_use]
    pub const fn new(env: Collaborators<'a>, presentation: &'a PresentationSettings) -> Self {
        Self { env, presentation }
    }

    /// Resolves and assembles the block. `None` when it should render nothing.
    ///
    /// The configured size is used when the view does not set one.
    #[must_use]
    pub fn content(
        &self,
        config: &BlockConfiguration,
        ctx: &RequestContext,
        view: BlockView,
    ) -> Option<TemplateData> {
        let payload = resolve(config, ctx, &self.env).ok()?;
        let view = view.with_size(view.size.or(config.size));
        Some(assemble(payload, ctx, view, self.presentation))
    }

    /// Renders the block text. Empty when the block has nothing to show.
    ///
    /// # Errors
    ///
    /// Returns an error only if the renderer fails.
    pub fn render(
        &self,
        config: &BlockConfiguration,
        ctx: &RequestContext,
        view: BlockView,
        renderer: &dyn TemplateRenderer,
    ) -> Result<String> {
        match self.content(config, ctx, view) {
            Some(data) => renderer.render(TEMPLATE_NAME, &data),
            None => {
                debug!(panel_id = view.panel_id, "block renders empty");
                Ok(String::new())
            }
        }
    }
}
