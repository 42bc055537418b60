use crate::error::{ParserError, Result};
use crate::language::Language;
use crate::parser::LanguageParser;
use std::collections::HashMap;

/// Deferred parser construction; grammar loading is expensive enough
/// that unused languages should never pay for it.
type ParserFactory = Box<dyn FnOnce() -> Box<dyn LanguageParser> + Send>;

enum Registration {
    Ready(Box<dyn LanguageParser>),
    Lazy(ParserFactory),
}

/// Language-keyed table of parser implementations.
///
/// An explicit instance owned by the session, passed by reference into
/// every consumer. Populate it before analysis begins; registration is
/// not guarded for concurrent mutation.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: HashMap<Language, Registration>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructed parser.
    ///
    /// Fails with [`ParserError::DuplicateRegistration`] when the parser's
    /// language already has an implementation, eager or lazy.
    pub fn register(&mut self, parser: Box<dyn LanguageParser>) -> Result<()> {
        let language = parser.language();
        if self.parsers.contains_key(&language) {
            return Err(ParserError::DuplicateRegistration { language });
        }
        self.parsers.insert(language, Registration::Ready(parser));
        Ok(())
    }

    /// Register a factory invoked on first use and memoized after.
    pub fn register_lazy<F>(&mut self, language: Language, factory: F) -> Result<()>
    where
        F: FnOnce() -> Box<dyn LanguageParser> + Send + 'static,
    {
        if self.parsers.contains_key(&language) {
            return Err(ParserError::DuplicateRegistration { language });
        }
        self.parsers
            .insert(language, Registration::Lazy(Box::new(factory)));
        Ok(())
    }

    /// Whether an implementation (eager or lazy) exists for `language`
    pub fn has_parser(&self, language: Language) -> bool {
        self.parsers.contains_key(&language)
    }

    /// Get the parser for `language`, invoking and caching a lazy factory
    /// on first call.
    ///
    /// A factory whose parser declares a different language fails with
    /// [`ParserError::LanguageMismatch`]; that registration is a setup
    /// defect and is discarded.
    pub fn parser_for(&mut self, language: Language) -> Result<&mut dyn LanguageParser> {
        if matches!(self.parsers.get(&language), Some(Registration::Lazy(_))) {
            if let Some(Registration::Lazy(factory)) = self.parsers.remove(&language) {
                let parser = factory();
                let actual = parser.language();
                if actual != language {
                    return Err(ParserError::LanguageMismatch {
                        expected: language,
                        actual,
                    });
                }
                log::debug!("Initialized lazy parser for {language}");
                self.parsers.insert(language, Registration::Ready(parser));
            }
        }

        match self.parsers.get_mut(&language) {
            Some(Registration::Ready(parser)) => Ok(parser.as_mut()),
            _ => Err(ParserError::NoParserRegistered { language }),
        }
    }
}
