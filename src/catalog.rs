//! Interaction catalog.
//!
//! Aggregates interactions and shared variables from one or more fixture
//! documents and answers live requests with consume-once selection.

use crate::config::{CatalogConfig, CatalogSettings};
use crate::error::Result;
use crate::exchange::{HttpRequest, ResponseArtifact};
use crate::interaction::{Interaction, CONSUMER_KEY, ID_REFERENCE_KEY, PROVIDER_KEY};
use crate::merge::{merge_into, shallow_merge};
use crate::reference::{
    parse_object, FileProvider, FsFileProvider, ReferenceResolver, FILE_REFERENCE_KEY,
};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

/// Consumer variable holding the base URL stripped from request paths.
pub const BASE_URL_KEY: &str = "baseUrl";
/// Consumer variable holding notification entries.
pub const NOTIFICATIONS_KEY: &str = "notifications";
/// Document key holding the interaction list.
pub const INTERACTIONS_KEY: &str = "interactions";

/// Extra matching rule consulted before an interaction's own suffix match.
pub trait MatchDelegate {
    fn matches(&self, request: &HttpRequest, interaction: &Interaction) -> bool;
}

impl<F> MatchDelegate for F
where
    F: Fn(&HttpRequest, &Interaction) -> bool,
{
    fn matches(&self, request: &HttpRequest, interaction: &Interaction) -> bool {
        self(request, interaction)
    }
}

/// All interactions and shared variables for one test run.
///
/// Not synchronized: selection marks records as consumed, so callers sharing
/// a catalog across threads must wrap it in a lock.
pub struct InteractionCatalog {
    interactions: Vec<Interaction>,
    consumer_variables: Map<String, Value>,
    provider_variables: Map<String, Value>,
    notifications: Vec<Map<String, Value>>,
    file_names: Vec<String>,
    settings: CatalogSettings,
    file_provider: Box<dyn FileProvider>,
    delegate: Option<Box<dyn MatchDelegate>>,
    /// Total lookups.
    requests_total: u64,
    /// Lookups that found an interaction.
    requests_matched: u64,
    /// Lookups that found nothing.
    requests_unmatched: u64,
}

impl Default for InteractionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InteractionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionCatalog")
            .field("interactions", &self.interactions)
            .field("consumer_variables", &self.consumer_variables)
            .field("provider_variables", &self.provider_variables)
            .field("notifications", &self.notifications)
            .field("file_names", &self.file_names)
            .field("settings", &self.settings)
            .field("has_delegate", &self.delegate.is_some())
            .finish_non_exhaustive()
    }
}

impl InteractionCatalog {
    /// Create an empty catalog reading files from disk.
    pub fn new() -> Self {
        Self {
            interactions: Vec::new(),
            consumer_variables: Map::new(),
            provider_variables: Map::new(),
            notifications: Vec::new(),
            file_names: Vec::new(),
            settings: CatalogSettings::default(),
            file_provider: Box::new(FsFileProvider),
            delegate: None,
            requests_total: 0,
            requests_matched: 0,
            requests_unmatched: 0,
        }
    }

    /// Read documents and references through `provider` instead of the disk.
    pub fn with_file_provider(mut self, provider: impl FileProvider + 'static) -> Self {
        self.file_provider = Box::new(provider);
        self
    }

    /// Consult `delegate` before each interaction's own matching rule.
    pub fn with_delegate(mut self, delegate: impl MatchDelegate + 'static) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }

    pub fn with_settings(mut self, settings: CatalogSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Load `files` in order.
    ///
    /// References resolve against `external_root`, or each file's own
    /// directory when no root is given.
    pub fn from_files<P: AsRef<Path>>(files: &[P], external_root: Option<&Path>) -> Self {
        let mut catalog = Self::new();
        catalog.load_files(files, external_root);
        catalog
    }

    /// Load a single document held in memory.
    pub fn from_json_str(document: &str, external_root: Option<&Path>) -> Self {
        let mut catalog = Self::new();
        catalog.merge_document(document, None, external_root);
        catalog
    }

    /// Load every document a configuration names.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let mut catalog = Self::new().with_settings(config.settings.clone());
        catalog.load_files(&config.documents, config.external_root.as_deref());
        catalog
    }

    /// Load `files` in order, returning how many interactions were added.
    pub fn load_files<P: AsRef<Path>>(&mut self, files: &[P], external_root: Option<&Path>) -> usize {
        if files.is_empty() {
            info!("Empty file list");
            return 0;
        }

        files
            .iter()
            .map(|file| self.load_file(file.as_ref(), external_root))
            .sum()
    }

    /// Load one fixture file, returning how many interactions were added.
    ///
    /// Unreadable files are logged and skipped.
    pub fn load_file(&mut self, path: &Path, external_root: Option<&Path>) -> usize {
        let bytes = match self.file_provider.read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "File error");
                return 0;
            }
        };
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "File is not UTF-8");
                return 0;
            }
        };

        info!(file = %path.display(), "Reading fixture document");

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        if let Some(name) = &file_name {
            self.file_names.push(name.clone());
        }

        let root = external_root.or_else(|| path.parent());
        self.merge_document(&text, file_name.as_deref(), root)
    }

    /// Merge one fixture document into the catalog.
    ///
    /// Returns how many interactions were appended. A document that is not
    /// a JSON object is logged and skipped; earlier documents stay loaded.
    pub fn merge_document(
        &mut self,
        document: &str,
        file_name: Option<&str>,
        external_root: Option<&Path>,
    ) -> usize {
        let origin = file_name.unwrap_or("<inline>");
        match self.try_merge_document(document, file_name, external_root) {
            Ok(added) => {
                debug!(file = origin, added, "Fixture document merged");
                added
            }
            Err(e) => {
                warn!(file = origin, error = %e, "Json parsing error");
                0
            }
        }
    }

    fn try_merge_document(
        &mut self,
        document: &str,
        file_name: Option<&str>,
        external_root: Option<&Path>,
    ) -> Result<usize> {
        let json = parse_object(document.as_bytes(), file_name.unwrap_or("<inline>"))?;
        let resolver = ReferenceResolver::new(self.file_provider.as_ref(), external_root);

        if let Some(Value::Object(consumer)) = json.get(CONSUMER_KEY) {
            let mut consumer = resolver.expand(consumer);
            consumer.remove(FILE_REFERENCE_KEY);
            merge_into(&mut self.consumer_variables, &consumer);

            if let Some(Value::Array(entries)) = self.consumer_variables.get(NOTIFICATIONS_KEY) {
                self.notifications
                    .extend(entries.iter().filter_map(Value::as_object).cloned());
            }
        }

        if let Some(Value::Object(provider)) = json.get(PROVIDER_KEY) {
            self.provider_variables = shallow_merge(&self.provider_variables, provider);
        }

        let Some(Value::Array(entries)) = json.get(INTERACTIONS_KEY) else {
            return Ok(0);
        };

        let base_url = self
            .consumer_variables
            .get(BASE_URL_KEY)
            .and_then(Value::as_str)
            .map(String::from);

        let mut added = 0;
        for entry in entries {
            let Some(entry) = entry.as_object() else {
                warn!(file = ?file_name, "Skipping interaction that is not an object");
                continue;
            };

            let template = entry
                .get(ID_REFERENCE_KEY)
                .and_then(Value::as_str)
                .and_then(|reference| {
                    let found = self.interactions.iter().find(|i| i.id() == Some(reference));
                    if found.is_none() {
                        warn!(reference, file = ?file_name, "Invalid idReference");
                    }
                    found
                });

            let interaction = match template {
                Some(template) => Interaction::from_template_with(template, entry, file_name, &resolver),
                None => Interaction::from_json(entry, base_url.as_deref(), file_name, &resolver),
            };

            self.interactions.push(interaction);
            added += 1;
        }

        Ok(added)
    }

    /// Pick the interaction answering `request` and mark it consumed.
    ///
    /// The first unconsumed match wins; once every match is consumed the
    /// last one keeps being returned.
    pub fn get_response(&mut self, request: &HttpRequest) -> Option<&Interaction> {
        self.requests_total += 1;

        let delegate = self.delegate.as_deref();
        let matched: Vec<usize> = self
            .interactions
            .iter()
            .enumerate()
            .filter(|(_, interaction)| {
                delegate.is_some_and(|d| d.matches(request, interaction)) || interaction.matches(request)
            })
            .map(|(idx, _)| idx)
            .collect();

        let chosen = matched
            .iter()
            .copied()
            .find(|&idx| !self.interactions[idx].is_consumed())
            .or_else(|| matched.last().copied());

        let Some(idx) = chosen else {
            self.requests_unmatched += 1;
            if self.settings.log_unmatched {
                warn!(method = %request.method, url = %request.url, "No matching interaction");
            }
            return None;
        };

        self.requests_matched += 1;
        let interaction = &mut self.interactions[idx];
        interaction.set_consumed(true);

        if self.settings.log_matches {
            info!(
                id = interaction.id().unwrap_or("nil"),
                method = %request.method,
                url = %request.url,
                candidates = matched.len(),
                "Found best match"
            );
        }

        Some(&*interaction)
    }

    /// Select an interaction for `request` and rebuild its response.
    pub fn get_response_artifact(&mut self, request: &HttpRequest) -> Option<ResponseArtifact> {
        self.get_response(request)?.to_response_artifact()
    }

    /// First interaction declaring `id`, regardless of consumption.
    pub fn interaction_by_id(&self, id: &str) -> Option<&Interaction> {
        self.interactions.iter().find(|i| i.id() == Some(id))
    }

    /// Clear the consumed flag on every interaction.
    pub fn reset_consumed(&mut self) {
        for interaction in &mut self.interactions {
            interaction.set_consumed(false);
        }
    }

    /// Append an interaction, e.g. one captured from a live exchange.
    pub fn record(&mut self, interaction: Interaction) {
        self.interactions.push(interaction);
    }

    /// Serialize the catalog as a fixture document.
    pub fn document(&self) -> Map<String, Value> {
        let mut document = Map::new();
        if !self.consumer_variables.is_empty() {
            document.insert(CONSUMER_KEY.to_string(), Value::Object(self.consumer_variables.clone()));
        }
        if !self.provider_variables.is_empty() {
            document.insert(PROVIDER_KEY.to_string(), Value::Object(self.provider_variables.clone()));
        }
        document.insert(
            INTERACTIONS_KEY.to_string(),
            Value::Array(
                self.interactions
                    .iter()
                    .map(|i| Value::Object(i.payload()))
                    .collect(),
            ),
        );
        document
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    pub fn consumer_variables(&self) -> &Map<String, Value> {
        &self.consumer_variables
    }

    pub fn provider_variables(&self) -> &Map<String, Value> {
        &self.provider_variables
    }

    pub fn consumer_variable(&self, key: &str) -> Option<&Value> {
        self.consumer_variables.get(key)
    }

    pub fn provider_variable(&self, key: &str) -> Option<&Value> {
        self.provider_variables.get(key)
    }

    /// Base URL declared in the consumer variables.
    pub fn base_url(&self) -> Option<&str> {
        self.consumer_variables.get(BASE_URL_KEY).and_then(Value::as_str)
    }

    pub fn notifications(&self) -> &[Map<String, Value>] {
        &self.notifications
    }

    /// Names of the files loaded so far, in load order.
    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }

    pub fn total_requests(&self) -> u64 {
        self.requests_total
    }

    pub fn total_matched(&self) -> u64 {
        self.requests_matched
    }

    pub fn total_unmatched(&self) -> u64 {
        self.requests_unmatched
    }
}
