//! Splitting replies into gateway-sized transmissions.

/// Default maximum characters per transmission.
pub const DEFAULT_CHUNK_SIZE: usize = 1600;

/// One outbound transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyChunk {
    /// Plain text body.
    Text(String),
    /// A bare URL, sent as attached media instead of text.
    Media(String),
}

impl ReplyChunk {
    /// What gets recorded in history for this chunk.
    pub fn content(&self) -> &str {
        match self {
            Self::Text(text) | Self::Media(text) => text,
        }
    }
}

/// Split a reply into chunks of at most `chunk_size` characters.
///
/// Counts characters, not bytes, so multi-byte text is never cut inside a
/// code point. An empty reply yields no chunks.
pub fn split_reply(reply: &str, chunk_size: usize) -> Vec<ReplyChunk> {
    let chunk_size = chunk_size.max(1);
    let chars: Vec<char> = reply.chars().collect();

    chars
        .chunks(chunk_size)
        .map(|piece| {
            let text: String = piece.iter().collect();
            if is_bare_url(&text) {
                ReplyChunk::Media(text)
            } else {
                ReplyChunk::Text(text)
            }
        })
        .collect()
}

/// An http(s) URL with nothing around it.
pub fn is_bare_url(text: &str) -> bool {
    (text.starts_with("http://") || text.starts_with("https://"))
        && !text.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_3300_chars() {
        let reply = "a".repeat(3300);
        let chunks = split_reply(&reply, DEFAULT_CHUNK_SIZE);

        let lengths: Vec<usize> = chunks.iter().map(|c| c.content().chars().count()).collect();
        assert_eq!(lengths, vec![1600, 1600, 100]);
        assert!(chunks.iter().all(|c| matches!(c, ReplyChunk::Text(_))));
    }

    #[test]
    fn test_short_reply_is_one_chunk() {
        assert_eq!(
            split_reply("hello", DEFAULT_CHUNK_SIZE),
            vec![ReplyChunk::Text("hello".to_string())]
        );
        assert!(split_reply("", DEFAULT_CHUNK_SIZE).is_empty());
    }

    #[test]
    fn test_multibyte_split_by_chars() {
        let reply = "é".repeat(5);
        let chunks = split_reply(&reply, 2);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].content(), "é");
    }

    #[test]
    fn test_url_chunk_is_media() {
        let chunks = split_reply("https://img.example.com/a.png", DEFAULT_CHUNK_SIZE);
        assert_eq!(
            chunks,
            vec![ReplyChunk::Media("https://img.example.com/a.png".to_string())]
        );
    }

    #[test]
    fn test_text_mentioning_url_is_text() {
        assert!(!is_bare_url("http://example.com is down"));
        assert!(!is_bare_url("httpbin rocks"));
        assert!(is_bare_url("http://example.com"));
    }
}
