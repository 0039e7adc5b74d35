use crate::doc::Doc;

/// One annotation pass over a document.
///
/// Lexicon annotators, rule layers and the domain passes all implement this,
/// so a pipeline is a chain of [`Doc::run_resolver`] calls.
pub trait Resolver {
    fn go(&self, doc: &mut Doc);
}

impl Doc {
    pub fn run_resolver<R: Resolver + ?Sized>(mut self, resolver: &R) -> Self {
        resolver.go(&mut self);
        self
    }
}
