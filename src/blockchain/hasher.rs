use sha2::{Digest, Sha256};

use super::block::Payload;

/// SHA-256 over the five canonical block fields, rendered as lowercase hex.
///
/// The preimage is `index:previous_hash:timestamp:payload:difficulty`, where
/// `payload` is [`Payload::canonical`]. The proof is deliberately left out:
/// it is checked against this digest, not folded into it.
pub fn digest(
    index: u64,
    previous_hash: &str,
    timestamp: i64,
    payload: &Payload,
    difficulty: u32,
) -> String {
    let preimage = format!(
        "{}:{}:{}:{}:{}",
        index,
        previous_hash,
        timestamp,
        payload.canonical(),
        difficulty
    );
    let mut hasher = Sha256::new();
    hasher.update(preimage.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::digest;
    use crate::blockchain::Payload;
    use serde_json::json;

    #[test]
    fn digest_is_64_lowercase_hex_chars() {
        let h = digest(0, "0", 1_465_154_705, &Payload::from("genesis block"), 16);
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn digest_is_deterministic() {
        let p = Payload::from("a");
        assert_eq!(digest(3, "prev", 10, &p, 8), digest(3, "prev", 10, &p, 8));
    }

    #[test]
    fn every_field_feeds_the_digest() {
        let p = Payload::from("a");
        let base = digest(3, "prev", 10, &p, 8);
        assert_ne!(base, digest(4, "prev", 10, &p, 8));
        assert_ne!(base, digest(3, "prew", 10, &p, 8));
        assert_ne!(base, digest(3, "prev", 11, &p, 8));
        assert_ne!(base, digest(3, "prev", 10, &Payload::from("b"), 8));
        assert_ne!(base, digest(3, "prev", 10, &p, 9));
    }

    #[test]
    fn logically_equal_objects_hash_equally() {
        let a: Payload = serde_json::from_str(r#"{"some":"acculi","data":"yes"}"#).unwrap();
        let b: Payload = serde_json::from_str(r#"{"data":"yes","some":"acculi"}"#).unwrap();
        assert_eq!(digest(1, "p", 1, &a, 1), digest(1, "p", 1, &b, 1));
    }

    #[test]
    fn string_and_number_payloads_do_not_collide() {
        let s = Payload::from("1");
        let n = Payload::from(json!(1));
        assert_ne!(digest(1, "p", 1, &s, 1), digest(1, "p", 1, &n, 1));
    }
}
