//! Sources and sinks for item streams.

use futures::{Stream, StreamExt};

use super::stage::ItemStream;

/// Wraps an in-memory sequence as an [`ItemStream`] of successes.
pub fn source_from<T, E, I>(items: I) -> ItemStream<T, E>
where
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    Box::pin(futures::stream::iter(items.into_iter().map(Ok)))
}

/// Pulls every item from the sequence, discarding values.
///
/// Resolves once the sequence is exhausted. Returns the first error
/// encountered and stops pulling, which also halts upstream production.
pub async fn drain<T, E, S>(stream: S) -> Result<(), E>
where
    S: Stream<Item = Result<T, E>> + Unpin,
{
    let mut stream = stream;
    while let Some(item) = stream.next().await {
        item?;
    }
    Ok(())
}

/// Collects every item from the sequence into a `Vec`.
///
/// Returns the first error encountered and stops pulling.
pub async fn collect<T, E, S>(stream: S) -> Result<Vec<T>, E>
where
    S: Stream<Item = Result<T, E>> + Unpin,
{
    let mut stream = stream;
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_consumes_everything() {
        let source = source_from::<_, String, _>(0..100u64);
        assert!(drain(source).await.is_ok());
    }

    #[tokio::test]
    async fn test_drain_returns_first_error() {
        let source: ItemStream<u64, String> = Box::pin(futures::stream::iter(vec![
            Ok(1),
            Err("first".to_string()),
            Err("second".to_string()),
        ]));
        assert_eq!(drain(source).await.unwrap_err(), "first");
    }

    #[tokio::test]
    async fn test_collect_preserves_order() {
        let source = source_from::<_, String, _>(vec!["a", "b", "c"]);
        assert_eq!(collect(source).await.unwrap(), vec!["a", "b", "c"]);
    }
}
