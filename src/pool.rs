//! Document pool: a cache of fetched schema documents keyed by their
//! canonical (fragment-less) URI, plus the optional standalone root.
use crate::{
    error::CompilationError,
    loaders::LoaderFactory,
    resolver::JsonReference,
};
use ahash::AHashMap;
use serde_json::Value;
use std::{fmt, sync::Arc};

pub(crate) struct SchemaPool {
    documents: AHashMap<String, Arc<Value>>,
    standalone: Option<Arc<Value>>,
    loader_factory: Arc<dyn LoaderFactory>,
}

impl SchemaPool {
    pub(crate) fn new(loader_factory: Arc<dyn LoaderFactory>) -> SchemaPool {
        SchemaPool {
            documents: AHashMap::new(),
            standalone: None,
            loader_factory,
        }
    }

    /// Register the root document when the schema was provided inline
    /// rather than by URL.
    pub(crate) fn set_standalone_document(&mut self, document: Arc<Value>) {
        self.standalone = Some(document);
    }

    pub(crate) fn standalone_document(&self) -> Option<Arc<Value>> {
        self.standalone.clone()
    }

    /// The cached document for the reference's base URI; on a miss the
    /// loader factory fetches and parses it. Loader and parse failures
    /// propagate as-is.
    pub(crate) fn get_document(
        &mut self,
        reference: &JsonReference,
    ) -> Result<Arc<Value>, CompilationError> {
        if !reference.has_full_url() {
            return Err(CompilationError::InvalidReference(format!(
                "{} must be canonical",
                reference
            )));
        }
        let key = reference.base_string();
        if let Some(document) = self.documents.get(&key) {
            return Ok(Arc::clone(document));
        }
        let loader = self.loader_factory.new_loader(&key);
        let document = Arc::new(loader.load_json()?);
        self.documents.insert(key, Arc::clone(&document));
        Ok(document)
    }
}

impl fmt::Debug for SchemaPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaPool")
            .field("documents", &self.documents.keys().collect::<Vec<_>>())
            .field("standalone", &self.standalone.is_some())
            .finish()
    }
}
