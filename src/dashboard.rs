use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskStatus};
use crate::tasks::TaskStore;

/// How far ahead a due date may lie to count as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;
/// Upper bound on the upcoming-deadline list.
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Serialize, Deserialize)]
pub struct Overview {
    pub task_counts: BTreeMap<TaskStatus, u64>,
    pub upcoming_deadlines: Vec<Task>,
}

/// Derives the dashboard view from the task store.
#[derive(Clone)]
pub struct DashboardAggregator {
    tasks: TaskStore,
}

impl DashboardAggregator {
    pub fn new(tasks: TaskStore) -> Self {
        Self { tasks }
    }

    /// Status counts over the whole closed set, zeros included, plus the
    /// caller's tasks due within the next seven days of `now` (bounds
    /// inclusive), ascending by due date, truncated to five entries.
    pub async fn overview(&self, owner_id: Uuid, now: DateTime<Utc>) -> Result<Overview, AppError> {
        let mut task_counts = BTreeMap::new();
        for status in TaskStatus::ALL {
            let count = self.tasks.count_with_status(owner_id, status).await?;
            task_counts.insert(status, count);
        }

        let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);
        let upcoming_deadlines = self
            .tasks
            .due_within(owner_id, now, horizon, UPCOMING_LIMIT)
            .await?;

        Ok(Overview {
            task_counts,
            upcoming_deadlines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskInput;
    use crate::store::memory::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn aggregator() -> (DashboardAggregator, TaskStore) {
        let tasks = TaskStore::new(Arc::new(MemoryStore::new("test")));
        (DashboardAggregator::new(tasks.clone()), tasks)
    }

    fn input(title: &str, status: TaskStatus) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: "A task".to_string(),
            status,
            priority: "medium".to_string(),
            due_date: None,
            tags: vec![],
            assignee_id: None,
        }
    }

    #[actix_rt::test]
    async fn test_counts_cover_every_status() {
        let (dashboard, tasks) = aggregator();
        let owner = Uuid::new_v4();

        tasks.create(input("a", TaskStatus::Todo), owner).await.unwrap();
        tasks.create(input("b", TaskStatus::Todo), owner).await.unwrap();
        tasks.create(input("c", TaskStatus::Done), owner).await.unwrap();

        let overview = dashboard.overview(owner, Utc::now()).await.unwrap();

        assert_eq!(overview.task_counts[&TaskStatus::Todo], 2);
        assert_eq!(overview.task_counts[&TaskStatus::Done], 1);
        assert_eq!(overview.task_counts[&TaskStatus::InProgress], 0);
        assert_eq!(overview.task_counts[&TaskStatus::Blocked], 0);
        assert_eq!(overview.task_counts.len(), TaskStatus::ALL.len());
    }

    #[actix_rt::test]
    async fn test_counts_are_scoped_to_owner() {
        let (dashboard, tasks) = aggregator();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        tasks.create(input("mine", TaskStatus::Todo), alice).await.unwrap();
        tasks.create(input("theirs", TaskStatus::Todo), bob).await.unwrap();

        let overview = dashboard.overview(alice, Utc::now()).await.unwrap();
        assert_eq!(overview.task_counts[&TaskStatus::Todo], 1);
    }

    #[actix_rt::test]
    async fn test_upcoming_respects_window() {
        let (dashboard, tasks) = aggregator();
        let owner = Uuid::new_v4();
        let now = Utc::now();

        let mut inside = input("inside", TaskStatus::Todo);
        inside.due_date = Some(now + Duration::days(3));
        tasks.create(inside, owner).await.unwrap();

        let mut outside = input("outside", TaskStatus::Todo);
        outside.due_date = Some(now + Duration::days(10));
        tasks.create(outside, owner).await.unwrap();

        let mut past = input("past", TaskStatus::Todo);
        past.due_date = Some(now - Duration::days(1));
        tasks.create(past, owner).await.unwrap();

        let overview = dashboard.overview(owner, now).await.unwrap();
        let titles: Vec<&str> = overview
            .upcoming_deadlines
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["inside"]);
    }

    #[actix_rt::test]
    async fn test_upcoming_is_sorted_and_capped_at_five() {
        let (dashboard, tasks) = aggregator();
        let owner = Uuid::new_v4();
        let now = Utc::now();

        // Seven candidates, inserted in reverse due-date order.
        for hours in (1..=7).rev() {
            let mut fields = input(&format!("due-in-{}h", hours), TaskStatus::Todo);
            fields.due_date = Some(now + Duration::hours(hours));
            tasks.create(fields, owner).await.unwrap();
        }

        let overview = dashboard.overview(owner, now).await.unwrap();
        let titles: Vec<&str> = overview
            .upcoming_deadlines
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["due-in-1h", "due-in-2h", "due-in-3h", "due-in-4h", "due-in-5h"]
        );
    }
}
