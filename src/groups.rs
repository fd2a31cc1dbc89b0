use crate::meta::{self, Document, OTHER_GROUP};

/// Entries shown in the "latest" section.
pub const LATEST_COUNT: usize = 10;

#[derive(Debug)]
pub struct ArchiveGroup {
    pub key: String,
    pub docs: Vec<Document>,
}

/// Partition documents into month groups. Input order (filename-descending)
/// is preserved inside each group; groups come out key-descending with the
/// sentinel group forced last.
pub fn group_by_month(docs: &[Document]) -> Vec<ArchiveGroup> {
    let mut groups: Vec<ArchiveGroup> = Vec::new();

    for doc in docs {
        let key = meta::month_key(&doc.name);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.docs.push(doc.clone()),
            None => groups.push(ArchiveGroup {
                key,
                docs: vec![doc.clone()],
            }),
        }
    }

    groups.sort_by(|a, b| {
        let a_other = a.key == OTHER_GROUP;
        let b_other = b.key == OTHER_GROUP;
        a_other.cmp(&b_other).then_with(|| b.key.cmp(&a.key))
    });

    groups
}

/// Non-owning view of the first `min(LATEST_COUNT, n)` documents of the
/// global ordering.
pub fn latest(docs: &[Document]) -> &[Document] {
    &docs[..docs.len().min(LATEST_COUNT)]
}

// ── Tests ──
