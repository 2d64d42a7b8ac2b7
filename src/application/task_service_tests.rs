#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::super::task_service::{TaskService, TaskServiceImpl};
    use crate::domain::error::{Error, Result};
    use crate::domain::repository::TodoRepository;
    use crate::domain::todo::{Task, TaskFilter, TaskId, Todo, TodoId};
    use crate::domain::user::UserId;

    #[derive(Default)]
    struct Inner {
        todos: Vec<Todo>,
        tasks: Vec<Task>,
    }

    #[derive(Clone, Default)]
    struct InMemoryTodos {
        inner: Arc<Mutex<Inner>>,
    }

    impl InMemoryTodos {
        fn task_count(&self) -> usize {
            self.inner.lock().unwrap().tasks.len()
        }
    }

    #[async_trait]
    impl TodoRepository for InMemoryTodos {
        async fn create_todo(&self, user: UserId, date: NaiveDate) -> Result<Todo> {
            let mut inner = self.inner.lock().unwrap();
            if let Some(existing) = inner
                .todos
                .iter()
                .find(|t| t.user_id == user && t.created_at == date)
            {
                return Ok(existing.clone());
            }
            let todo = Todo {
                id: TodoId(inner.todos.len() as i64 + 1),
                created_at: date,
                user_id: user,
            };
            inner.todos.push(todo.clone());
            Ok(todo)
        }

        async fn todo_for_date(&self, user: UserId, date: NaiveDate) -> Result<Option<Todo>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .todos
                .iter()
                .find(|t| t.user_id == user && t.created_at == date)
                .cloned())
        }

        async fn tasks_of(&self, todo: TodoId) -> Result<Vec<Task>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .tasks
                .iter()
                .filter(|t| t.todo_id == todo)
                .cloned()
                .collect())
        }

        async fn add_task(&self, todo: TodoId, text: &str) -> Result<Task> {
            let mut inner = self.inner.lock().unwrap();
            let task = Task {
                id: TaskId(inner.tasks.len() as i64 + 1),
                task: text.to_string(),
                completed: false,
                todo_id: todo,
            };
            inner.tasks.push(task.clone());
            Ok(task)
        }

        async fn task_owner(&self, id: TaskId) -> Result<Option<(Task, UserId)>> {
            let inner = self.inner.lock().unwrap();
            let Some(task) = inner.tasks.iter().find(|t| t.id == id).cloned() else {
                return Ok(None);
            };
            let owner = inner
                .todos
                .iter()
                .find(|t| t.id == task.todo_id)
                .map(|t| t.user_id)
                .ok_or(Error::NotFound)?;
            Ok(Some((task, owner)))
        }

        async fn mark_completed(&self, id: TaskId) -> Result<()> {
            let mut inner = self.inner.lock().unwrap();
            let task = inner.tasks.iter_mut().find(|t| t.id == id).ok_or(Error::NotFound)?;
            task.completed = true;
            Ok(())
        }

        async fn tasks_for_user(&self, user: UserId, filter: TaskFilter) -> Result<Vec<Task>> {
            let inner = self.inner.lock().unwrap();
            let mut joined: Vec<(NaiveDate, Task)> = inner
                .tasks
                .iter()
                .filter_map(|task| {
                    inner
                        .todos
                        .iter()
                        .find(|todo| todo.id == task.todo_id && todo.user_id == user)
                        .map(|todo| (todo.created_at, task.clone()))
                })
                .filter(|(_, task)| match filter {
                    TaskFilter::All => true,
                    TaskFilter::Completed => task.completed,
                    TaskFilter::Uncompleted => !task.completed,
                })
                .collect();
            joined.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.id.0.cmp(&b.1.id.0)));
            Ok(joined.into_iter().map(|(_, task)| task).collect())
        }
    }

    const ALICE: UserId = UserId(1);
    const MALLORY: UserId = UserId(2);

    fn service() -> (TaskServiceImpl<InMemoryTodos>, InMemoryTodos) {
        let repo = InMemoryTodos::default();
        (TaskServiceImpl::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn no_list_until_explicitly_started() {
        let (service, _) = service();
        assert!(service.today(ALICE).await.unwrap().is_none());
        let todo = service.start_today(ALICE).await.unwrap();
        let (found, tasks) = service.today(ALICE).await.unwrap().unwrap();
        assert_eq!(found.id, todo.id);
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn starting_today_twice_returns_the_same_list() {
        let (service, _) = service();
        let first = service.start_today(ALICE).await.unwrap();
        let second = service.start_today(ALICE).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn added_task_starts_uncompleted() {
        let (service, _) = service();
        service.start_today(ALICE).await.unwrap();
        let task = service.add_task(ALICE, "buy milk").await.unwrap();
        assert_eq!(task.task, "buy milk");
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn empty_task_is_rejected_and_nothing_is_persisted() {
        let (service, repo) = service();
        service.start_today(ALICE).await.unwrap();
        let err = service.add_task(ALICE, "   ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(repo.task_count(), 0);
    }

    #[tokio::test]
    async fn overlong_task_is_rejected() {
        let (service, _) = service();
        service.start_today(ALICE).await.unwrap();
        let err = service.add_task(ALICE, &"x".repeat(101)).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn adding_a_task_without_a_list_is_not_found() {
        let (service, _) = service();
        let err = service.add_task(ALICE, "buy milk").await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[tokio::test]
    async fn completing_a_task_is_idempotent() {
        let (service, _) = service();
        service.start_today(ALICE).await.unwrap();
        let task = service.add_task(ALICE, "buy milk").await.unwrap();
        service.complete_task(ALICE, task.id).await.unwrap();
        service.complete_task(ALICE, task.id).await.unwrap();
        let completed = service.tasks(ALICE, TaskFilter::Completed).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].completed);
    }

    #[tokio::test]
    async fn completing_another_users_task_is_forbidden() {
        let (service, _) = service();
        service.start_today(ALICE).await.unwrap();
        let task = service.add_task(ALICE, "buy milk").await.unwrap();
        let err = service.complete_task(MALLORY, task.id).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden));
        let tasks = service.tasks(ALICE, TaskFilter::Uncompleted).await.unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test]
    async fn completing_an_unknown_task_is_not_found() {
        let (service, _) = service();
        let err = service.complete_task(ALICE, TaskId(99)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[tokio::test]
    async fn completion_moves_a_task_between_filtered_views() {
        let (service, _) = service();
        service.start_today(ALICE).await.unwrap();
        let task = service.add_task(ALICE, "buy milk").await.unwrap();

        let all = service.tasks(ALICE, TaskFilter::All).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].task, "buy milk");
        assert!(!all[0].completed);

        service.complete_task(ALICE, task.id).await.unwrap();
        let completed = service.tasks(ALICE, TaskFilter::Completed).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert!(service.tasks(ALICE, TaskFilter::Uncompleted).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_lists_newest_day_first() {
        let (service, repo) = service();
        let day = |d: u32| NaiveDate::from_ymd_opt(2026, 8, d).unwrap();
        let monday = repo.create_todo(ALICE, day(17)).await.unwrap();
        let friday = repo.create_todo(ALICE, day(21)).await.unwrap();
        repo.add_task(monday.id, "old task").await.unwrap();
        repo.add_task(friday.id, "new task").await.unwrap();

        let all = service.tasks(ALICE, TaskFilter::All).await.unwrap();
        let texts: Vec<&str> = all.iter().map(|t| t.task.as_str()).collect();
        assert_eq!(texts, ["new task", "old task"]);
    }
}
