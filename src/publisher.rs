use serde::{Deserialize, Serialize};

use crate::config::{Credential, TODOIST_TASKS_URL};

/// Todoist's most urgent priority (shown red in the apps).
pub const HIGHEST_PRIORITY: u8 = 4;

/// Error of a single task creation. It never affects the other tasks of a run.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The request couldn't be sent or no response arrived
    #[error("request to task service failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The service answered with a non-success status (bad token, validation, ...)
    #[error("task service rejected the task: status={status}, body={body:?}")]
    Rejected { status: u16, body: String },
    /// The task was probably created but the answer couldn't be read
    #[error("unexpected response from task service: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Request body for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask<'a> {
    pub content: &'a str,
    pub due_string: &'static str,
    pub priority: u8,
}

impl<'a> NewTask<'a> {
    /// A task due today with the highest priority.
    pub fn due_today(content: &'a str) -> Self {
        NewTask {
            content,
            due_string: "today",
            priority: HIGHEST_PRIORITY,
        }
    }
}

/// The part of the service's answer that is reported back to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedTask {
    pub id: String,
    pub content: String,
}

/// Something tasks can be created in.
pub trait TaskService {
    fn create_task(&self, task: &NewTask<'_>) -> Result<CreatedTask, PublishError>;
}

/// Blocking client for the Todoist REST API.
pub struct TodoistClient {
    http: reqwest::blocking::Client,
    url: String,
    credential: Credential,
}

impl TodoistClient {
    pub fn new(credential: Credential) -> Self {
        Self::with_url(credential, TODOIST_TASKS_URL)
    }

    pub fn with_url(credential: Credential, url: impl Into<String>) -> Self {
        TodoistClient {
            http: reqwest::blocking::Client::new(),
            url: url.into(),
            credential,
        }
    }
}

impl TaskService for TodoistClient {
    fn create_task(&self, task: &NewTask<'_>) -> Result<CreatedTask, PublishError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(self.credential.token())
            .json(task)
            .send()
            .map_err(PublishError::Transport)?;

        let status = response.status();
        log::trace!("Task service responded with {status}");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        response.json().map_err(PublishError::Decode)
    }
}

/// Result of one attempted task.
#[derive(Debug)]
pub struct TaskOutcome {
    pub content: String,
    pub result: Result<CreatedTask, PublishError>,
}

/// Per task results of a run in the order the tasks were attempted.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub outcomes: Vec<TaskOutcome>,
}

impl PublishReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Create every task in order. A failing task is recorded and the loop goes on,
/// nothing is retried or rolled back.
pub fn publish_all<S: TaskService + ?Sized>(service: &S, tasks: &[String]) -> PublishReport {
    let mut report = PublishReport::default();
    for content in tasks {
        let result = service.create_task(&NewTask::due_today(content));
        match &result {
            Ok(created) => log::debug!("Created task {} ({content})", created.id),
            Err(err) => log::warn!("Creating task '{content}' failed: {err}"),
        }
        report.outcomes.push(TaskOutcome {
            content: content.clone(),
            result,
        });
    }
    report
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records each request and rejects the attempts listed in `fail_on`.
    struct FakeService {
        fail_on: Vec<usize>,
        seen: RefCell<Vec<NewTask<'static>>>,
    }

    impl FakeService {
        fn failing_on(fail_on: &[usize]) -> Self {
            FakeService {
                fail_on: fail_on.to_vec(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl TaskService for FakeService {
        fn create_task(&self, task: &NewTask<'_>) -> Result<CreatedTask, PublishError> {
            let mut seen = self.seen.borrow_mut();
            let attempt = seen.len();
            seen.push(NewTask {
                content: String::from(task.content).leak(),
                due_string: task.due_string,
                priority: task.priority,
            });
            if self.fail_on.contains(&attempt) {
                Err(PublishError::Rejected {
                    status: 500,
                    body: "boom".into(),
                })
            } else {
                Ok(CreatedTask {
                    id: attempt.to_string(),
                    content: task.content.to_owned(),
                })
            }
        }
    }

    fn tasks(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("task {i}")).collect()
    }

    #[test]
    fn failure_in_the_middle_does_not_stop_the_batch() {
        let service = FakeService::failing_on(&[1]);
        let report = publish_all(&service, &tasks(4));

        assert_eq!(service.seen.borrow().len(), 4);
        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.failed(), 1);

        let contents: Vec<_> = report.outcomes.iter().map(|o| o.content.as_str()).collect();
        assert_eq!(contents, ["task 1", "task 2", "task 3", "task 4"]);
        assert!(matches!(
            report.outcomes[1].result,
            Err(PublishError::Rejected { status: 500, .. })
        ));
        assert!(report.outcomes[3].result.is_ok());
    }

    #[test]
    fn every_task_is_due_today_with_highest_priority() {
        let service = FakeService::failing_on(&[]);
        publish_all(&service, &tasks(2));
        for task in service.seen.borrow().iter() {
            assert_eq!(task.due_string, "today");
            assert_eq!(task.priority, HIGHEST_PRIORITY);
        }
    }

    #[test]
    fn all_failing_is_still_reported_per_task() {
        let service = FakeService::failing_on(&[0, 1, 2]);
        let report = publish_all(&service, &tasks(3));
        assert_eq!(report.failed(), 3);
        assert_eq!(report.outcomes.len(), 3);
    }

    #[test]
    fn request_body_has_todoist_shape() {
        let body = serde_json::to_value(NewTask::due_today("💪 训练: squats")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "content": "💪 训练: squats",
                "due_string": "today",
                "priority": 4,
            })
        );
    }

    #[test]
    fn created_task_ignores_extra_fields() {
        let created: CreatedTask = serde_json::from_str(
            r#"{"id":"6X7rM8997g3RQmvh","content":"🥣 早餐: oats","priority":4,"checked":false}"#,
        )
        .unwrap();
        assert_eq!(created.id, "6X7rM8997g3RQmvh");
        assert_eq!(created.content, "🥣 早餐: oats");
    }
}
