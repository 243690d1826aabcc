//! Configuration module for bookshelf.
//!
//! Two kinds of configuration live here:
//! - [`Config`], the per-run options derived from CLI arguments
//! - the immutable lookup tables the extractor and the catalog generator are
//!   built with ([`ExtractorConfig`], [`CatalogConfig`]). Their `Default`
//!   impls carry the fixed namespace URIs and query expressions; tests build
//!   their own to substitute fixtures.

use anyhow::{Result, bail};
use std::collections::HashMap;
use std::path::PathBuf;

/// Namespace of the OCF container manifest (`META-INF/container.xml`).
pub const CONTAINER_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:container";
/// Namespace of the OPF package document.
pub const OPF_NS: &str = "http://www.idpf.org/2007/opf";
/// Dublin Core elements namespace.
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
/// FictionBook 2.0 namespace.
pub const FB2_NS: &str = "http://www.gribuser.ru/xml/fictionbook/2.0";
/// XLink namespace used for catalog links.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Name of the generated catalog inside the library root.
pub const CATALOG_FILE_NAME: &str = "output.fb2";

/// Default library folder, relative to the working directory.
pub const DEFAULT_LIBRARY: &str = "books";

/// Prefix-to-URI table used to resolve qualified names in queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    map: HashMap<String, String>,
}

impl Namespaces {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `uri`, replacing any earlier binding.
    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.map.insert(prefix.into(), uri.into());
        self
    }

    /// Look up the URI bound to `prefix`.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.map.get(prefix).map(String::as_str)
    }
}

/// Query expressions for EPUB metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpubQueries {
    /// Manifest entry holding the container description.
    pub manifest_entry: String,
    /// Locates the package document path, evaluated on the container root element.
    pub container: String,
    /// Book title, evaluated on the package document.
    pub title: String,
    /// Book creators, evaluated on the package document.
    pub creator: String,
}

impl Default for EpubQueries {
    fn default() -> Self {
        Self {
            manifest_entry: "META-INF/container.xml".to_string(),
            container: "n:rootfiles/n:rootfile/@full-path".to_string(),
            title: "/pkg:package/pkg:metadata/dc:title".to_string(),
            creator: "/pkg:package/pkg:metadata/dc:creator".to_string(),
        }
    }
}

/// Query expressions for FB2 metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fb2Queries {
    /// Book title.
    pub title: String,
    /// Author elements.
    pub author: String,
    /// First name, relative to an author element.
    pub first_name: String,
    /// Last name, relative to an author element.
    pub last_name: String,
}

impl Default for Fb2Queries {
    fn default() -> Self {
        Self {
            title: "//fb:title-info/fb:book-title".to_string(),
            author: "//fb:title-info/fb:author".to_string(),
            first_name: "fb:first-name".to_string(),
            last_name: "fb:last-name".to_string(),
        }
    }
}

/// Everything the metadata extractor needs to know about document layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Prefix table shared by both query sets.
    pub namespaces: Namespaces,
    /// EPUB queries.
    pub epub: EpubQueries,
    /// FB2 queries.
    pub fb2: Fb2Queries,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            namespaces: Namespaces::new()
                .with("n", CONTAINER_NS)
                .with("pkg", OPF_NS)
                .with("dc", DC_NS)
                .with("fb", FB2_NS),
            epub: EpubQueries::default(),
            fb2: Fb2Queries::default(),
        }
    }
}

/// Settings for the generated catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Default namespace of the catalog document.
    pub document_ns: String,
    /// Prefix bound to the link namespace.
    pub link_prefix: String,
    /// Namespace of the `href` attribute on links.
    pub link_ns: String,
    /// Book title written into the front matter.
    pub title: String,
    /// Catalog file name inside the library root.
    pub file_name: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            document_ns: FB2_NS.to_string(),
            link_prefix: "xlink".to_string(),
            link_ns: XLINK_NS.to_string(),
            title: "MyLibrary".to_string(),
            file_name: CATALOG_FILE_NAME.to_string(),
        }
    }
}

/// Complete configuration for a library run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Library folder holding loose books and author folders.
    pub library: PathBuf,

    /// Dry run mode - extract and plan without touching files.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Generate the catalog after organizing.
    pub catalog: bool,

    /// Document layouts for metadata extraction.
    pub extractor: ExtractorConfig,

    /// Catalog layout.
    pub catalog_config: CatalogConfig,
}

impl Config {
    /// Configuration for `library` with default tables.
    pub fn for_library(library: impl Into<PathBuf>) -> Self {
        Self {
            library: library.into(),
            dry_run: false,
            verbose: false,
            quiet: false,
            catalog: true,
            extractor: ExtractorConfig::default(),
            catalog_config: CatalogConfig::default(),
        }
    }

    /// Path of the catalog file this run writes.
    pub fn catalog_path(&self) -> PathBuf {
        self.library.join(&self.catalog_config.file_name)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The library path is empty
    /// - Verbose and quiet modes are both enabled
    /// - The catalog file name is empty or contains a path separator
    pub fn validate(&self) -> Result<()> {
        if self.library.as_os_str().is_empty() {
            bail!("No library folder specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        let name = &self.catalog_config.file_name;
        if name.is_empty() || name.contains(['/', '\\']) {
            bail!("Catalog file name must be a plain file name, got '{name}'");
        }

        Ok(())
    }
}
