use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskPatch, TaskQuery, TaskStatus};
use crate::store::{DocumentStore, Filter};

const COLLECTION: &str = "tasks";

/// Fields the listing endpoint accepts for ascending sort.
const SORT_FIELDS: [&str; 6] = [
    "created_at",
    "updated_at",
    "due_date",
    "title",
    "priority",
    "status",
];

/// Ownership-scoped task persistence.
///
/// Every operation takes the caller's id and folds it into the store filter,
/// so a task owned by someone else is indistinguishable from one that does
/// not exist: both answer `NotFound`.
#[derive(Clone)]
pub struct TaskStore {
    store: Arc<dyn DocumentStore>,
}

impl TaskStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn owned(owner_id: Uuid) -> Filter {
        Filter::new().eq("owner_id", json!(owner_id))
    }

    fn owned_task(id: Uuid, owner_id: Uuid) -> Filter {
        Self::owned(owner_id).eq("id", json!(id))
    }

    pub async fn create(&self, input: TaskInput, owner_id: Uuid) -> Result<Task, AppError> {
        let task = Task::new(input, owner_id);
        self.store
            .insert_one(COLLECTION, serde_json::to_value(&task)?)
            .await?;
        Ok(task)
    }

    /// Lists the owner's tasks, optionally narrowed by status and assignee,
    /// sorted ascending by the requested field (`created_at` by default).
    /// Unknown sort fields are rejected rather than silently ignored.
    pub async fn list(&self, owner_id: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let mut filter = Self::owned(owner_id);
        if let Some(raw) = query.status.as_deref().filter(|s| !s.is_empty()) {
            let status: TaskStatus = raw.parse()?;
            filter = filter.eq("status", json!(status));
        }
        if let Some(assignee) = query.assignee {
            filter = filter.eq("assignee_id", json!(assignee));
        }

        let sort = match query.sort.as_deref().filter(|s| !s.is_empty()) {
            None => "created_at",
            Some(field) if SORT_FIELDS.contains(&field) => field,
            Some(other) => {
                return Err(AppError::InvalidFilter(format!(
                    "Cannot sort by field: {}",
                    other
                )))
            }
        };

        let docs = self
            .store
            .find_many(COLLECTION, &filter, Some(sort), None)
            .await?;
        docs.into_iter()
            .map(|doc| Ok(serde_json::from_value(doc)?))
            .collect()
    }

    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> Result<Task, AppError> {
        match self
            .store
            .find_one(COLLECTION, &Self::owned_task(id, owner_id))
            .await?
        {
            Some(doc) => Ok(serde_json::from_value(doc)?),
            None => Err(AppError::NotFound("Task not found".to_string())),
        }
    }

    /// Applies the fields present in `patch` and refreshes `updated_at`.
    /// An empty patch still refreshes `updated_at`.
    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, AppError> {
        self.apply(id, owner_id, serde_json::to_value(&patch)?)
            .await
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
        let deleted = self
            .store
            .delete_one(COLLECTION, &Self::owned_task(id, owner_id))
            .await?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound("Task not found".to_string()))
        }
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        owner_id: Uuid,
        status: TaskStatus,
    ) -> Result<Task, AppError> {
        self.apply(id, owner_id, json!({ "status": status })).await
    }

    /// Points the task at an assignee. The reference is not checked against
    /// the user directory; dangling assignees are allowed.
    pub async fn set_assignee(
        &self,
        id: Uuid,
        owner_id: Uuid,
        assignee_id: Uuid,
    ) -> Result<Task, AppError> {
        self.apply(id, owner_id, json!({ "assignee_id": assignee_id }))
            .await
    }

    pub async fn count_with_status(
        &self,
        owner_id: Uuid,
        status: TaskStatus,
    ) -> Result<u64, AppError> {
        let filter = Self::owned(owner_id).eq("status", json!(status));
        Ok(self.store.count(COLLECTION, &filter).await?)
    }

    /// The owner's tasks with a due date inside `[from, to]`, ascending by
    /// due date, at most `limit` entries.
    pub async fn due_within(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Task>, AppError> {
        let filter = Self::owned(owner_id).date_within("due_date", from, to);
        let docs = self
            .store
            .find_many(COLLECTION, &filter, Some("due_date"), Some(limit))
            .await?;
        docs.into_iter()
            .map(|doc| Ok(serde_json::from_value(doc)?))
            .collect()
    }

    async fn apply(&self, id: Uuid, owner_id: Uuid, mut set: Value) -> Result<Task, AppError> {
        if let Some(fields) = set.as_object_mut() {
            fields.insert("updated_at".to_string(), json!(Utc::now()));
        }
        let matched = self
            .store
            .update_one(COLLECTION, &Self::owned_task(id, owner_id), set)
            .await?;
        if !matched {
            return Err(AppError::NotFound("Task not found".to_string()));
        }
        self.get(id, owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn store() -> TaskStore {
        TaskStore::new(Arc::new(MemoryStore::new("test")))
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: "A task".to_string(),
            status: TaskStatus::Todo,
            priority: "medium".to_string(),
            due_date: None,
            tags: vec![],
            assignee_id: None,
        }
    }

    #[actix_rt::test]
    async fn test_create_then_get_round_trip() {
        let tasks = store();
        let owner = Uuid::new_v4();

        let mut fields = input("Write report");
        fields.tags = vec!["work".to_string(), "q3".to_string()];
        let created = tasks.create(fields, owner).await.unwrap();

        let fetched = tasks.get(created.id, owner).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.owner_id, owner);
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert_eq!(fetched.tags, vec!["work", "q3"]);
    }

    #[actix_rt::test]
    async fn test_foreign_tasks_are_not_found() {
        let tasks = store();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let task = tasks.create(input("Alice's task"), alice).await.unwrap();

        assert!(matches!(
            tasks.get(task.id, bob).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            tasks.update(task.id, bob, TaskPatch::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            tasks.set_status(task.id, bob, TaskStatus::Done).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            tasks.set_assignee(task.id, bob, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            tasks.delete(task.id, bob).await,
            Err(AppError::NotFound(_))
        ));

        // The owner still sees the task untouched.
        let untouched = tasks.get(task.id, alice).await.unwrap();
        assert_eq!(untouched.status, TaskStatus::Todo);
    }

    #[actix_rt::test]
    async fn test_list_filters_by_status_and_assignee() {
        let tasks = store();
        let owner = Uuid::new_v4();
        let assignee = Uuid::new_v4();

        let mut done = input("Done task");
        done.status = TaskStatus::Done;
        tasks.create(done, owner).await.unwrap();

        let mut assigned = input("Assigned task");
        assigned.assignee_id = Some(assignee);
        tasks.create(assigned, owner).await.unwrap();

        tasks.create(input("Plain task"), owner).await.unwrap();

        let by_status = tasks
            .list(
                owner,
                &TaskQuery {
                    status: Some("done".to_string()),
                    ..TaskQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].title, "Done task");

        let by_assignee = tasks
            .list(
                owner,
                &TaskQuery {
                    assignee: Some(assignee),
                    ..TaskQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_assignee.len(), 1);
        assert_eq!(by_assignee[0].title, "Assigned task");
    }

    #[actix_rt::test]
    async fn test_list_never_leaks_other_owners() {
        let tasks = store();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let mut fields = input("Alice done");
        fields.status = TaskStatus::Done;
        tasks.create(fields, alice).await.unwrap();

        let mut fields = input("Bob done");
        fields.status = TaskStatus::Done;
        tasks.create(fields, bob).await.unwrap();

        let listed = tasks
            .list(
                alice,
                &TaskQuery {
                    status: Some("done".to_string()),
                    ..TaskQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Alice done");
    }

    #[actix_rt::test]
    async fn test_list_sorts_by_requested_field() {
        let tasks = store();
        let owner = Uuid::new_v4();

        for title in ["cherry", "apple", "banana"] {
            tasks.create(input(title), owner).await.unwrap();
        }

        let listed = tasks
            .list(
                owner,
                &TaskQuery {
                    sort: Some("title".to_string()),
                    ..TaskQuery::default()
                },
            )
            .await
            .unwrap();
        let titles: Vec<&str> = listed.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["apple", "banana", "cherry"]);

        // Default sort is creation order.
        let listed = tasks.list(owner, &TaskQuery::default()).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["cherry", "apple", "banana"]);
    }

    #[actix_rt::test]
    async fn test_list_rejects_unknown_sort_and_status() {
        let tasks = store();
        let owner = Uuid::new_v4();

        let err = tasks
            .list(
                owner,
                &TaskQuery {
                    sort: Some("password_hash".to_string()),
                    ..TaskQuery::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFilter(_)));

        let err = tasks
            .list(
                owner,
                &TaskQuery {
                    status: Some("urgent".to_string()),
                    ..TaskQuery::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus(_)));
    }

    #[actix_rt::test]
    async fn test_update_applies_only_present_fields() {
        let tasks = store();
        let owner = Uuid::new_v4();
        let created = tasks.create(input("Original"), owner).await.unwrap();

        let patch = TaskPatch {
            title: Some("Renamed".to_string()),
            ..TaskPatch::default()
        };
        let updated = tasks.update(created.id, owner, patch).await.unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.status, created.status);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[actix_rt::test]
    async fn test_set_status_is_idempotent() {
        let tasks = store();
        let owner = Uuid::new_v4();
        let created = tasks.create(input("Flip me"), owner).await.unwrap();

        let first = tasks
            .set_status(created.id, owner, TaskStatus::Done)
            .await
            .unwrap();
        let second = tasks
            .set_status(created.id, owner, TaskStatus::Done)
            .await
            .unwrap();

        assert_eq!(first.status, TaskStatus::Done);
        assert_eq!(second.status, TaskStatus::Done);
        assert!(second.updated_at >= first.updated_at);
    }

    #[actix_rt::test]
    async fn test_delete_then_delete_again_is_not_found() {
        let tasks = store();
        let owner = Uuid::new_v4();
        let created = tasks.create(input("Ephemeral"), owner).await.unwrap();

        tasks.delete(created.id, owner).await.unwrap();
        assert!(matches!(
            tasks.delete(created.id, owner).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            tasks.get(created.id, owner).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_due_within_window_and_limit() {
        let tasks = store();
        let owner = Uuid::new_v4();
        let now = Utc::now();

        for (title, days) in [("soon", 1), ("later", 6), ("too-late", 10)] {
            let mut fields = input(title);
            fields.due_date = Some(now + Duration::days(days));
            tasks.create(fields, owner).await.unwrap();
        }
        tasks.create(input("undated"), owner).await.unwrap();

        let due = tasks
            .due_within(owner, now, now + Duration::days(7), 5)
            .await
            .unwrap();
        let titles: Vec<&str> = due.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["soon", "later"]);

        let capped = tasks
            .due_within(owner, now, now + Duration::days(7), 1)
            .await
            .unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].title, "soon");
    }
}
