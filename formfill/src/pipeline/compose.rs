//! Structural composition of stages.

use super::stage::{ItemStream, Stage};

/// An ordered chain of stages, applied to a source as one transform.
///
/// `Pipeline::new(s1).then(s2).then(s3).run(source)` is equivalent to
/// `s3(s2(s1(source)))`. Composition is purely structural: it introduces no
/// buffering, ordering, or error handling beyond what each stage already
/// provides.
pub struct Pipeline<In, Out, E> {
    apply: Stage<In, Out, E>,
}

impl<In, Out, E> Pipeline<In, Out, E>
where
    In: 'static,
    Out: 'static,
    E: 'static,
{
    /// Starts a pipeline from its first stage.
    pub fn new(stage: Stage<In, Out, E>) -> Self {
        Self { apply: stage }
    }

    /// Appends a stage to the chain.
    pub fn then<Next>(self, stage: Stage<Out, Next, E>) -> Pipeline<In, Next, E>
    where
        Next: 'static,
    {
        Pipeline {
            apply: Box::new(move |input: ItemStream<In, E>| stage((self.apply)(input))),
        }
    }

    /// Applies the whole chain to a source sequence.
    pub fn run(self, source: ItemStream<In, E>) -> ItemStream<Out, E> {
        (self.apply)(source)
    }
}
