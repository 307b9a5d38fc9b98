use crate::config::DEFAULT_INCORRECT_OFFSET;
use crate::errors::{QueueError, QueueResult};
use crate::models::domain::{QueueNode, ReviewQueue};

/// Pure Leitner-style rotation over a [`ReviewQueue`]. Holds no storage and
/// performs no I/O; callers load the queue, apply an answer and persist the
/// result themselves.
///
/// A correctly answered question is re-appended at the tail, so it comes
/// around again only after every other question. An incorrectly answered
/// question is reinserted a short, configurable distance ahead: after the
/// move it has `min(incorrect_offset, remaining)` other questions in front
/// of it, where `remaining` is the rest of the rotation.
pub struct SchedulerService {
    incorrect_offset: u32,
}

impl SchedulerService {
    pub fn new(incorrect_offset: u32) -> Self {
        Self {
            // An offset of zero would reinsert at the head and ask the same
            // question forever.
            incorrect_offset: incorrect_offset.max(1),
        }
    }

    /// The question currently due for review: the head of the chain.
    pub fn current<'a>(&self, queue: &'a ReviewQueue) -> QueueResult<&'a QueueNode> {
        let head = queue.head.ok_or(QueueError::EmptyQueue)?;
        queue.node_at(head)
    }

    /// Applies one answer to the head question and re-threads the chain.
    /// Returns the slot of the answered node so the caller can project the
    /// updated state.
    ///
    /// `question_id` must identify the current head; anything else is a
    /// stale submission and is rejected before any state changes.
    pub fn submit_answer(
        &self,
        queue: &mut ReviewQueue,
        question_id: &str,
        correct: bool,
    ) -> QueueResult<u32> {
        let head = queue.head.ok_or(QueueError::EmptyQueue)?;

        if queue.node_at(head)?.id != question_id {
            return Err(QueueError::StaleAnswer(question_id.to_string()));
        }

        let node = queue.node_at_mut(head)?;
        node.times_asked += 1;
        if correct {
            node.correct_count += 1;
        }

        // A single question has nowhere else to go.
        if queue.len() == 1 {
            return Ok(head);
        }

        let new_head = queue.node_at(head)?.next.ok_or_else(|| {
            QueueError::MalformedQueue(format!(
                "head has no successor although {} nodes remain",
                queue.len()
            ))
        })?;

        let anchor = if correct {
            self.walk_to_tail(queue, new_head)?
        } else {
            self.walk_offset(queue, new_head)?
        };

        let spliced_next = queue.node_at(anchor)?.next;
        queue.node_at_mut(head)?.next = spliced_next;
        queue.node_at_mut(anchor)?.next = Some(head);
        queue.head = Some(new_head);

        Ok(head)
    }

    /// Follows the chain from `start` to the tail. Bounded so a corrupted
    /// chain with a cycle fails instead of spinning.
    fn walk_to_tail(&self, queue: &ReviewQueue, start: u32) -> QueueResult<u32> {
        let mut cursor = start;
        let mut hops = 0usize;

        while let Some(next) = queue.node_at(cursor)?.next {
            cursor = next;
            hops += 1;
            if hops > queue.len() {
                return Err(QueueError::MalformedQueue(format!(
                    "tail walk exceeded {} hops",
                    queue.len()
                )));
            }
        }

        Ok(cursor)
    }

    /// Follows `incorrect_offset - 1` links from the new head, stopping early
    /// at the tail. Reinserting after the returned slot leaves the answered
    /// question `min(incorrect_offset, remaining)` places from the front.
    fn walk_offset(&self, queue: &ReviewQueue, new_head: u32) -> QueueResult<u32> {
        let mut cursor = new_head;

        for _ in 1..self.incorrect_offset {
            match queue.node_at(cursor)?.next {
                Some(next) => cursor = next,
                None => break,
            }
        }

        Ok(cursor)
    }
}

impl Default for SchedulerService {
    fn default() -> Self {
        Self::new(DEFAULT_INCORRECT_OFFSET)
    }
}
