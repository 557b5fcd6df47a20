//! Tamper-evident audit journal
//!
//! Every committed mutating call appends one [`RegistryFact`]. Entries are
//! chained: each digest covers the entry's sequence number, the previous
//! digest, the call context and the fact, so editing or dropping any entry
//! breaks every digest after it. The journal has no removal API.

use coffer_core::{AssetId, CallContext, ContentDigest, Principal, Tier, VaultId};
use serde::{Deserialize, Serialize};

/// Digest of the (absent) entry before sequence 1
pub const GENESIS_DIGEST: [u8; 32] = [0u8; 32];

/// State change committed by one registry call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryFact {
    /// A vault was established
    VaultEstablished {
        /// New vault
        vault_id: VaultId,
        /// Its display name
        name: String,
    },
    /// A vault was retired
    VaultRetired {
        /// Retired vault
        vault_id: VaultId,
    },
    /// An asset was enrolled with iteration 1
    AssetEnrolled {
        /// New asset
        asset_id: AssetId,
        /// History generation the enrollment opened
        generation: u32,
        /// Digest of iteration 1
        hash_digest: ContentDigest,
    },
    /// A revision was appended to an asset
    RevisionPublished {
        /// Revised asset
        asset_id: AssetId,
        /// New iteration number
        iteration: u32,
        /// Digest of the new iteration
        hash_digest: ContentDigest,
    },
    /// An asset was retired
    AssetRetired {
        /// Retired asset
        asset_id: AssetId,
    },
    /// An attach call committed
    AssetAttached {
        /// Target vault
        vault_id: VaultId,
        /// Attached asset
        asset_id: AssetId,
        /// `false` when the link already existed
        created: bool,
    },
    /// A detach call committed
    AssetDetached {
        /// Source vault
        vault_id: VaultId,
        /// Detached asset
        asset_id: AssetId,
        /// `false` when no link existed
        removed: bool,
    },
    /// A vault-scoped grant was written
    VaultAccessGranted {
        /// Vault the grant applies to
        vault_id: VaultId,
        /// Grantee
        principal: Principal,
        /// Granted tier
        tier: Tier,
    },
    /// An asset-scoped grant was written
    AssetAccessGranted {
        /// Asset the grant applies to
        asset_id: AssetId,
        /// Grantee
        principal: Principal,
        /// Granted tier
        tier: Tier,
    },
}

impl RegistryFact {
    /// Short name of the fact kind
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryFact::VaultEstablished { .. } => "vault_established",
            RegistryFact::VaultRetired { .. } => "vault_retired",
            RegistryFact::AssetEnrolled { .. } => "asset_enrolled",
            RegistryFact::RevisionPublished { .. } => "revision_published",
            RegistryFact::AssetRetired { .. } => "asset_retired",
            RegistryFact::AssetAttached { .. } => "asset_attached",
            RegistryFact::AssetDetached { .. } => "asset_detached",
            RegistryFact::VaultAccessGranted { .. } => "vault_access_granted",
            RegistryFact::AssetAccessGranted { .. } => "asset_access_granted",
        }
    }

    fn encode(&self, enc: &mut CanonicalEncoder) {
        enc.put_str(self.kind());
        match self {
            RegistryFact::VaultEstablished { vault_id, name } => {
                enc.put_str(vault_id.as_str());
                enc.put_str(name);
            }
            RegistryFact::VaultRetired { vault_id } => enc.put_str(vault_id.as_str()),
            RegistryFact::AssetEnrolled {
                asset_id,
                generation,
                hash_digest,
            } => {
                enc.put_str(asset_id.as_str());
                enc.put_u64(u64::from(*generation));
                enc.put_bytes(hash_digest.as_bytes());
            }
            RegistryFact::RevisionPublished {
                asset_id,
                iteration,
                hash_digest,
            } => {
                enc.put_str(asset_id.as_str());
                enc.put_u64(u64::from(*iteration));
                enc.put_bytes(hash_digest.as_bytes());
            }
            RegistryFact::AssetRetired { asset_id } => enc.put_str(asset_id.as_str()),
            RegistryFact::AssetAttached {
                vault_id,
                asset_id,
                created: flag,
            }
            | RegistryFact::AssetDetached {
                vault_id,
                asset_id,
                removed: flag,
            } => {
                enc.put_str(vault_id.as_str());
                enc.put_str(asset_id.as_str());
                enc.put_u8(u8::from(*flag));
            }
            RegistryFact::VaultAccessGranted {
                vault_id,
                principal,
                tier,
            } => {
                enc.put_str(vault_id.as_str());
                enc.put_str(principal.as_str());
                enc.put_u8(tier.as_u8());
            }
            RegistryFact::AssetAccessGranted {
                asset_id,
                principal,
                tier,
            } => {
                enc.put_str(asset_id.as_str());
                enc.put_str(principal.as_str());
                enc.put_u8(tier.as_u8());
            }
        }
    }
}

/// Length-prefixed, format-stable byte encoding used for chain digests
#[derive(Default)]
struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        self.put_u64(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    fn put_str(&mut self, value: &str) {
        self.put_bytes(value.as_bytes());
    }
}

/// One chained journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal, dense from 1
    pub sequence: u64,
    /// Caller and ordinal time of the committing call
    pub context: CallContext,
    /// Committed state change
    pub fact: RegistryFact,
    /// Digest of the previous entry
    pub prev_digest: [u8; 32],
    /// Digest of this entry
    pub digest: [u8; 32],
}

impl JournalEntry {
    fn compute_digest(
        sequence: u64,
        prev_digest: &[u8; 32],
        context: &CallContext,
        fact: &RegistryFact,
    ) -> [u8; 32] {
        let mut enc = CanonicalEncoder::default();
        enc.put_u64(sequence);
        enc.put_bytes(prev_digest);
        enc.put_str(context.caller.as_str());
        enc.put_u64(context.at.value());
        fact.encode(&mut enc);
        *blake3::hash(&enc.buf).as_bytes()
    }

    /// Hex encoding of this entry's digest
    pub fn digest_hex(&self) -> String {
        blake3::Hash::from(self.digest).to_hex().to_string()
    }
}

/// Journal chain verification failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JournalError {
    /// Sequence numbers are not dense from 1
    #[error("Journal sequence gap: expected {expected}, found {found}")]
    SequenceGap {
        /// Sequence number that should have appeared
        expected: u64,
        /// Sequence number that did appear
        found: u64,
    },

    /// An entry's links or digest do not match its contents
    #[error("Journal chain broken at sequence {sequence}")]
    BrokenChain {
        /// First entry whose digest check failed
        sequence: u64,
    },
}

/// Append-only, hash-chained log of committed facts
#[derive(Debug, Clone, Default)]
pub struct AuditJournal {
    entries: Vec<JournalEntry>,
}

impl AuditJournal {
    /// Rebuild a journal from stored entries, verifying the chain
    pub fn from_entries(entries: Vec<JournalEntry>) -> Result<Self, JournalError> {
        let journal = Self { entries };
        journal.verify_chain()?;
        Ok(journal)
    }

    /// All entries in sequence order
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Digest the next entry will chain from
    pub fn head_digest(&self) -> [u8; 32] {
        self.entries
            .last()
            .map_or(GENESIS_DIGEST, |entry| entry.digest)
    }

    /// Entries whose fact mentions the given asset
    pub fn entries_for_asset<'a>(
        &'a self,
        asset: &'a AssetId,
    ) -> impl Iterator<Item = &'a JournalEntry> + 'a {
        self.entries.iter().filter(move |entry| match &entry.fact {
            RegistryFact::AssetEnrolled { asset_id, .. }
            | RegistryFact::RevisionPublished { asset_id, .. }
            | RegistryFact::AssetRetired { asset_id }
            | RegistryFact::AssetAttached { asset_id, .. }
            | RegistryFact::AssetDetached { asset_id, .. }
            | RegistryFact::AssetAccessGranted { asset_id, .. } => asset_id == asset,
            _ => false,
        })
    }

    pub(crate) fn append(&mut self, context: &CallContext, fact: RegistryFact) -> &JournalEntry {
        let sequence = self.entries.len() as u64 + 1;
        let prev_digest = self.head_digest();
        let digest = JournalEntry::compute_digest(sequence, &prev_digest, context, &fact);
        self.entries.push(JournalEntry {
            sequence,
            context: context.clone(),
            fact,
            prev_digest,
            digest,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Recompute every digest and link
    pub fn verify_chain(&self) -> Result<(), JournalError> {
        let mut prev = GENESIS_DIGEST;
        for (position, entry) in self.entries.iter().enumerate() {
            let expected = position as u64 + 1;
            if entry.sequence != expected {
                return Err(JournalError::SequenceGap {
                    expected,
                    found: entry.sequence,
                });
            }
            let recomputed =
                JournalEntry::compute_digest(entry.sequence, &prev, &entry.context, &entry.fact);
            if entry.prev_digest != prev || entry.digest != recomputed {
                return Err(JournalError::BrokenChain {
                    sequence: entry.sequence,
                });
            }
            prev = entry.digest;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ctx(caller: &str, at: u64) -> CallContext {
        CallContext::new(caller, at)
    }

    fn sample_journal() -> AuditJournal {
        let mut journal = AuditJournal::default();
        journal.append(
            &ctx("alice", 1),
            RegistryFact::VaultEstablished {
                vault_id: VaultId::new("v1"),
                name: "Legal".into(),
            },
        );
        journal.append(
            &ctx("alice", 2),
            RegistryFact::AssetEnrolled {
                asset_id: AssetId::new("doc-1"),
                generation: 0,
                hash_digest: ContentDigest::new([1; 32]),
            },
        );
        journal.append(
            &ctx("alice", 3),
            RegistryFact::AssetAttached {
                vault_id: VaultId::new("v1"),
                asset_id: AssetId::new("doc-1"),
                created: true,
            },
        );
        journal
    }

    #[test]
    fn test_chain_links_entries() {
        let journal = sample_journal();
        journal.verify_chain().unwrap();
        let entries = journal.entries();
        assert_eq!(entries[0].prev_digest, GENESIS_DIGEST);
        assert_eq!(entries[1].prev_digest, entries[0].digest);
        assert_eq!(journal.head_digest(), entries[2].digest);
        assert_eq!(entries[2].digest_hex().len(), 64);
    }

    #[test]
    fn test_tampered_fact_breaks_chain() {
        let mut entries = sample_journal().entries().to_vec();
        entries[1].fact = RegistryFact::AssetEnrolled {
            asset_id: AssetId::new("doc-1"),
            generation: 0,
            hash_digest: ContentDigest::new([2; 32]),
        };
        assert_matches!(
            AuditJournal::from_entries(entries),
            Err(JournalError::BrokenChain { sequence: 2 })
        );
    }

    #[test]
    fn test_dropped_entry_is_detected() {
        let mut entries = sample_journal().entries().to_vec();
        entries.remove(1);
        assert_matches!(
            AuditJournal::from_entries(entries),
            Err(JournalError::SequenceGap {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_entries_for_asset_filters() {
        let journal = sample_journal();
        let doc = AssetId::new("doc-1");
        let kinds: Vec<_> = journal
            .entries_for_asset(&doc)
            .map(|e| e.fact.kind())
            .collect();
        assert_eq!(kinds, vec!["asset_enrolled", "asset_attached"]);
    }
}
