//! Sentence framing and reply parsing.
//!
//! A sentence is an ordered list of words terminated on the wire by a
//! zero-length word. Replies start with a tag word (`!re`, `!done`,
//! `!trap`, ...) followed by attribute words of the form `=key=value`.

use std::collections::HashMap;
use std::io::{Read, Write};

use crate::error::Result;
use crate::proto::codec;

/// One parsed reply sentence: tag plus attribute mapping.
#[derive(Debug, Clone)]
pub struct Reply {
    pub tag: String,
    pub attributes: HashMap<String, String>,
}

impl Reply {
    /// The `message` attribute routers attach to `!trap` replies, when any.
    pub fn message(&self) -> Option<&str> {
        self.attributes.get("message").map(String::as_str)
    }
}

/// Write all words of one sentence, then the terminating empty word.
pub fn write_sentence<W, I, T>(writer: &mut W, words: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    for word in words {
        codec::write_word(writer, word.as_ref())?;
    }
    codec::write_word(writer, b"")?;
    Ok(())
}

/// Read words until the terminating empty word.
///
/// Word contents are treated as UTF-8; the API only carries ASCII command
/// paths and attribute text, so lossy conversion never fires in practice.
pub fn read_sentence<R: Read>(reader: &mut R) -> Result<Vec<String>> {
    let mut words = Vec::new();
    loop {
        let word = codec::read_word(reader)?;
        if word.is_empty() {
            return Ok(words);
        }
        words.push(String::from_utf8_lossy(&word).into_owned());
    }
}

/// Parse a non-empty sentence into its tag and attribute mapping.
///
/// Attribute words strip the leading `=` and split on the next `=`; words
/// carrying no value map to the empty string.
pub fn parse_reply(words: &[String]) -> Reply {
    let tag = words[0].clone();
    let mut attributes = HashMap::new();

    for word in &words[1..] {
        let stripped = word.strip_prefix('=').unwrap_or(word);
        match stripped.split_once('=') {
            Some((key, value)) => attributes.insert(key.to_string(), value.to_string()),
            None => attributes.insert(stripped.to_string(), String::new()),
        };
    }

    Reply { tag, attributes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn owned(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_sentence_round_trip() {
        let mut buffer = Vec::new();
        write_sentence(&mut buffer, ["/login", "=name=admin"]).unwrap();

        let words = read_sentence(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(words, vec!["/login".to_string(), "=name=admin".to_string()]);
    }

    #[test]
    fn test_empty_sentence_round_trip() {
        let mut buffer = Vec::new();
        write_sentence(&mut buffer, std::iter::empty::<&str>()).unwrap();
        assert_eq!(buffer, vec![0u8]);

        let words = read_sentence(&mut Cursor::new(buffer)).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn test_parse_reply_attributes() {
        let reply = parse_reply(&owned(&["!re", "=address=10.0.0.1", "bareword"]));

        assert_eq!(reply.tag, "!re");
        assert_eq!(reply.attributes.get("address").unwrap(), "10.0.0.1");
        assert_eq!(reply.attributes.get("bareword").unwrap(), "");
    }

    #[test]
    fn test_parse_reply_value_keeps_embedded_equals() {
        let reply = parse_reply(&owned(&["!re", "=comment=a=b"]));
        assert_eq!(reply.attributes.get("comment").unwrap(), "a=b");
    }

    #[test]
    fn test_trap_message() {
        let reply = parse_reply(&owned(&["!trap", "=message=failure: already have lease"]));
        assert_eq!(reply.tag, "!trap");
        assert_eq!(reply.message().unwrap(), "failure: already have lease");
    }
}
