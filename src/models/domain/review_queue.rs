use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::errors::{QueueError, QueueResult};
use crate::models::domain::Question;

/// One question threaded into a user's review rotation.
///
/// `next` is a slot index into the owning queue's `nodes` vector rather than
/// a reference, so the whole chain persists and reloads as plain data. `None`
/// marks the tail of the rotation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QueueNode {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub times_asked: u32,
    pub correct_count: u32,
    pub next: Option<u32>,
}

/// A user's review rotation: a singly linked chain threaded through the
/// stable slots of `nodes`, entered at `head`.
///
/// Slots are assigned once at seed time and are never reused, reordered or
/// shrunk afterwards; re-ordering the rotation only rewrites `next` fields
/// and `head`. Content fields are immutable here; only the scheduler touches
/// the per-node statistics.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReviewQueue {
    pub nodes: Vec<QueueNode>,
    pub head: Option<u32>,
}

impl ReviewQueue {
    /// Builds the initial rotation from a snapshot of the question bank:
    /// bank order becomes chain order, the last entry is the tail, and the
    /// first entry is the head. An empty bank yields an empty queue.
    pub fn seed(bank: &[Question]) -> Self {
        let last = bank.len().saturating_sub(1);
        let nodes: Vec<QueueNode> = bank
            .iter()
            .enumerate()
            .map(|(slot, entry)| QueueNode {
                id: entry.id.clone(),
                question: entry.question.clone(),
                answer: entry.answer.clone(),
                times_asked: 0,
                correct_count: 0,
                next: if slot < last { Some(slot as u32 + 1) } else { None },
            })
            .collect();

        let head = if nodes.is_empty() { None } else { Some(0) };
        ReviewQueue { nodes, head }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_at(&self, index: u32) -> QueueResult<&QueueNode> {
        self.nodes
            .get(index as usize)
            .ok_or(QueueError::InvalidIndex {
                index,
                len: self.nodes.len(),
            })
    }

    pub fn node_at_mut(&mut self, index: u32) -> QueueResult<&mut QueueNode> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(index as usize)
            .ok_or(QueueError::InvalidIndex { index, len })
    }

    /// Lazy walk of the chain from `head` to the tail. Each call starts fresh
    /// from the current head. The iterator refuses to follow corrupted data:
    /// a revisited slot (cycle) or a chain that ends before covering every
    /// node yields `MalformedQueue`, a dangling index yields `InvalidIndex`,
    /// and iteration stops after the first error.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            queue: self,
            cursor: self.head,
            visited: vec![false; self.nodes.len()],
            seen: 0,
            halted: false,
        }
    }

    /// The chain as a vector of slot indices, head first.
    pub fn chain(&self) -> QueueResult<Vec<u32>> {
        self.traverse().collect()
    }

    /// Integrity check for loaded state: the chain must cover every node
    /// exactly once, `head` must agree with emptiness, and no node may
    /// report more correct answers than times asked.
    pub fn validate(&self) -> QueueResult<()> {
        match self.head {
            Some(_) if self.nodes.is_empty() => {
                return Err(QueueError::MalformedQueue(
                    "head set on a queue with no nodes".to_string(),
                ));
            }
            None if !self.nodes.is_empty() => {
                return Err(QueueError::MalformedQueue(format!(
                    "head missing on a queue of {} nodes",
                    self.nodes.len()
                )));
            }
            _ => {}
        }

        self.chain()?;

        for (slot, node) in self.nodes.iter().enumerate() {
            if node.correct_count > node.times_asked {
                return Err(QueueError::MalformedQueue(format!(
                    "slot {} answered correctly {} times but asked only {}",
                    slot, node.correct_count, node.times_asked
                )));
            }
        }

        Ok(())
    }
}

pub struct Traverse<'a> {
    queue: &'a ReviewQueue,
    cursor: Option<u32>,
    visited: Vec<bool>,
    seen: usize,
    halted: bool,
}

impl Iterator for Traverse<'_> {
    type Item = QueueResult<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }

        let index = match self.cursor {
            Some(index) => index,
            None => {
                self.halted = true;
                if self.seen == self.queue.len() {
                    return None;
                }
                return Some(Err(QueueError::MalformedQueue(format!(
                    "chain ends after {} of {} nodes",
                    self.seen,
                    self.queue.len()
                ))));
            }
        };

        let node = match self.queue.node_at(index) {
            Ok(node) => node,
            Err(err) => {
                self.halted = true;
                return Some(Err(err));
            }
        };

        if self.visited[index as usize] {
            self.halted = true;
            return Some(Err(QueueError::MalformedQueue(format!(
                "cycle through slot {}",
                index
            ))));
        }

        self.visited[index as usize] = true;
        self.seen += 1;
        self.cursor = node.next;
        Some(Ok(index))
    }
}

/// Per-user persisted wrapper around a [`ReviewQueue`].
///
/// `revision` keys the conditional write that serializes concurrent answer
/// submissions for one user: every successful save increments it, and a save
/// against a stale revision matches nothing.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserQueue {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub queue: ReviewQueue,
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl UserQueue {
    pub fn new(user_id: &str, queue: ReviewQueue) -> Self {
        UserQueue {
            id: None,
            user_id: user_id.to_string(),
            queue,
            revision: 0,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn seed_links_nodes_in_bank_order() {
        let queue = ReviewQueue::seed(&fixtures::question_bank());

        assert_eq!(queue.len(), 5);
        assert_eq!(queue.head, Some(0));

        assert_eq!(queue.nodes[0].question, "This is index 0");
        assert_eq!(queue.nodes[0].answer, "answer zero");
        assert_eq!(queue.nodes[0].times_asked, 0);
        assert_eq!(queue.nodes[0].correct_count, 0);
        assert_eq!(queue.nodes[0].next, Some(1));

        assert_eq!(queue.nodes[4].question, "This is index 4");
        assert_eq!(queue.nodes[4].answer, "answer four");
        assert_eq!(queue.nodes[4].next, None);
    }

    #[test]
    fn seed_of_empty_bank_is_empty() {
        let queue = ReviewQueue::seed(&[]);

        assert!(queue.is_empty());
        assert_eq!(queue.head, None);
        assert!(queue.chain().expect("empty chain is valid").is_empty());
        assert!(queue.validate().is_ok());
    }

    #[test]
    fn chain_walks_head_to_tail() {
        let queue = fixtures::seeded_queue();

        assert_eq!(queue.chain().expect("fresh queue is valid"), vec![0, 1, 2, 3, 4]);
        assert!(queue.validate().is_ok());
    }

    #[test]
    fn traverse_is_restartable() {
        let queue = fixtures::seeded_queue();

        let first: QueueResult<Vec<u32>> = queue.traverse().collect();
        let second: QueueResult<Vec<u32>> = queue.traverse().collect();

        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn node_at_rejects_out_of_range_index() {
        let queue = fixtures::seeded_queue();

        let err = queue.node_at(9).unwrap_err();
        assert_eq!(err, QueueError::InvalidIndex { index: 9, len: 5 });
    }

    #[test]
    fn traverse_detects_cycle() {
        let mut queue = fixtures::seeded_queue();
        // 0 -> 1 -> 2 -> 0 ...
        queue.nodes[2].next = Some(0);

        let result: QueueResult<Vec<u32>> = queue.traverse().collect();
        assert!(matches!(result, Err(QueueError::MalformedQueue(_))));
        assert!(queue.validate().is_err());
    }

    #[test]
    fn traverse_detects_truncated_chain() {
        let mut queue = fixtures::seeded_queue();
        // Chain ends at slot 2, leaving 3 and 4 unreachable.
        queue.nodes[2].next = None;

        let result: QueueResult<Vec<u32>> = queue.traverse().collect();
        assert!(matches!(result, Err(QueueError::MalformedQueue(_))));
    }

    #[test]
    fn traverse_detects_dangling_index() {
        let mut queue = fixtures::seeded_queue();
        queue.nodes[2].next = Some(42);

        let result: QueueResult<Vec<u32>> = queue.traverse().collect();
        assert_eq!(result, Err(QueueError::InvalidIndex { index: 42, len: 5 }));
    }

    #[test]
    fn traverse_stops_after_first_error() {
        let mut queue = fixtures::seeded_queue();
        queue.nodes[1].next = Some(0);

        let mut iter = queue.traverse();
        assert_eq!(iter.next(), Some(Ok(0)));
        assert_eq!(iter.next(), Some(Ok(1)));
        assert!(matches!(iter.next(), Some(Err(QueueError::MalformedQueue(_)))));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn validate_rejects_head_mismatch() {
        let mut queue = fixtures::seeded_queue();
        queue.head = None;
        assert!(matches!(
            queue.validate(),
            Err(QueueError::MalformedQueue(_))
        ));

        let empty = ReviewQueue {
            nodes: vec![],
            head: Some(0),
        };
        assert!(matches!(
            empty.validate(),
            Err(QueueError::MalformedQueue(_))
        ));
    }

    #[test]
    fn validate_rejects_impossible_statistics() {
        let mut queue = fixtures::seeded_queue();
        queue.nodes[3].correct_count = 2;
        queue.nodes[3].times_asked = 1;

        assert!(matches!(
            queue.validate(),
            Err(QueueError::MalformedQueue(_))
        ));
    }

    #[test]
    fn queue_round_trips_through_json() {
        let queue = fixtures::seeded_queue();

        let json = serde_json::to_string(&queue).expect("queue should serialize");
        let restored: ReviewQueue = serde_json::from_str(&json).expect("queue should deserialize");

        assert_eq!(queue, restored);
        assert_eq!(
            queue.chain().unwrap(),
            restored.chain().unwrap()
        );
    }

    #[test]
    fn user_queue_round_trips_through_bson() {
        let user_queue = UserQueue::new("user-1", fixtures::seeded_queue());

        let doc = mongodb::bson::to_document(&user_queue).expect("should encode to BSON");
        let restored: UserQueue =
            mongodb::bson::from_document(doc).expect("should decode from BSON");

        assert_eq!(restored.user_id, "user-1");
        assert_eq!(restored.revision, 0);
        assert_eq!(restored.queue, user_queue.queue);
    }

    #[test]
    fn user_queue_starts_at_revision_zero() {
        let user_queue = UserQueue::new("user-1", fixtures::seeded_queue());

        assert!(user_queue.id.is_none());
        assert_eq!(user_queue.revision, 0);
        assert_eq!(user_queue.queue.head, Some(0));
    }
}
