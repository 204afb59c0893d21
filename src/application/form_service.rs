//! Form lifecycle, public submission intake, and dashboard queries.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::forms::{
    internal_keys_stripped, is_honeypot_tripped, submissions_to_csv, FieldSpec, Form, FormField,
    NewForm, NewSubmission, Submission,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::Plan;
use crate::ports::{
    DashboardStats, FormRepository, FormUpdate, Page, PlanRepository, StatsReader,
    SubmissionRepository, UsageStats, UserRepository,
};

use super::Paginated;

/// Limits applied to users without a paid plan.
const FREE_FORM_LIMIT: i64 = 3;
const FREE_SUBMISSION_LIMIT: i64 = 100;

/// Client-supplied form definition.
#[derive(Debug, Clone, Deserialize)]
pub struct FormInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default = "default_spam_protection")]
    pub spam_protection: bool,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

fn default_spam_protection() -> bool {
    true
}

impl FormInput {
    fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title is required"));
        }
        for field in &self.fields {
            field.validate()?;
        }
        Ok(())
    }
}

/// A form with its field definitions.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FormDetail {
    #[serde(flatten)]
    pub form: Form,
    pub fields: Vec<FormField>,
}

/// Result of a public submission attempt. A tripped honeypot produces the
/// same outcome as a stored submission so bots learn nothing.
#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub redirect_url: Option<String>,
    pub stored: bool,
}

/// Usage against plan limits.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UsageReport {
    pub forms_used: i64,
    pub form_limit: i64,
    pub submissions_this_month: i64,
    pub submission_limit_monthly: i64,
}

#[derive(Clone)]
pub struct FormService {
    forms: Arc<dyn FormRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    stats: Arc<dyn StatsReader>,
    users: Arc<dyn UserRepository>,
    plans: Arc<dyn PlanRepository>,
}

impl FormService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        stats: Arc<dyn StatsReader>,
        users: Arc<dyn UserRepository>,
        plans: Arc<dyn PlanRepository>,
    ) -> Self {
        Self {
            forms,
            submissions,
            stats,
            users,
            plans,
        }
    }

    pub async fn create_form(
        &self,
        user_id: Uuid,
        input: FormInput,
    ) -> Result<FormDetail, DomainError> {
        input.validate()?;

        let used = self.forms.count_for_owner(user_id).await?;
        let limit = self.form_limit(user_id).await?;
        if used >= limit {
            return Err(DomainError::validation(
                "forms",
                format!("Form limit reached ({} of {})", used, limit),
            ));
        }

        let form = self
            .forms
            .create(&NewForm {
                user_id,
                title: input.title.trim().to_string(),
                description: input.description,
                endpoint_id: Form::generate_endpoint_id(),
                redirect_url: input.redirect_url,
                spam_protection: input.spam_protection,
                fields: input.fields,
            })
            .await?;
        let fields = self.forms.fields(form.id).await?;

        info!(user_id = %user_id, form_id = %form.id, "form created");
        Ok(FormDetail { form, fields })
    }

    pub async fn list_forms(&self, user_id: Uuid) -> Result<Vec<Form>, DomainError> {
        self.forms.list_for_owner(user_id).await
    }

    pub async fn form_detail(
        &self,
        user_id: Uuid,
        form_id: Uuid,
    ) -> Result<FormDetail, DomainError> {
        let form = self.require_owned(user_id, form_id).await?;
        let fields = self.forms.fields(form.id).await?;
        Ok(FormDetail { form, fields })
    }

    pub async fn update_form(
        &self,
        user_id: Uuid,
        form_id: Uuid,
        input: FormInput,
    ) -> Result<FormDetail, DomainError> {
        input.validate()?;
        self.require_owned(user_id, form_id).await?;

        self.forms
            .update(
                form_id,
                &FormUpdate {
                    title: input.title.trim().to_string(),
                    description: input.description,
                    redirect_url: input.redirect_url,
                    spam_protection: input.spam_protection,
                    fields: input.fields,
                },
            )
            .await?;

        self.form_detail(user_id, form_id).await
    }

    pub async fn delete_form(&self, user_id: Uuid, form_id: Uuid) -> Result<(), DomainError> {
        self.require_owned(user_id, form_id).await?;
        self.forms.delete(form_id).await?;
        info!(user_id = %user_id, form_id = %form_id, "form deleted");
        Ok(())
    }

    /// Accept a public submission posted to a form's endpoint.
    ///
    /// With spam protection on, a filled honeypot field produces a success
    /// outcome without storing anything. Keys starting with `_` are
    /// stripped before storage.
    pub async fn intake(
        &self,
        endpoint_id: &str,
        data: Map<String, Value>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<IntakeOutcome, DomainError> {
        let form = self
            .forms
            .find_by_endpoint(endpoint_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::FormNotFound, "Form not found"))?;

        if form.spam_protection && is_honeypot_tripped(&data) {
            debug!(form_id = %form.id, "honeypot tripped, dropping submission");
            return Ok(IntakeOutcome {
                redirect_url: form.redirect_url,
                stored: false,
            });
        }

        let clean = internal_keys_stripped(data);
        self.submissions
            .insert(&NewSubmission {
                form_id: form.id,
                data: Value::Object(clean),
                ip_address,
                user_agent,
            })
            .await?;

        Ok(IntakeOutcome {
            redirect_url: form.redirect_url,
            stored: true,
        })
    }

    pub async fn list_submissions(
        &self,
        user_id: Uuid,
        form_id: Uuid,
        page: Page,
    ) -> Result<Paginated<Submission>, DomainError> {
        self.require_owned(user_id, form_id).await?;
        let (items, total) = self.submissions.list(form_id, page).await?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn submission_detail(
        &self,
        user_id: Uuid,
        form_id: Uuid,
        submission_id: Uuid,
    ) -> Result<Submission, DomainError> {
        self.require_owned(user_id, form_id).await?;
        self.submissions
            .find(form_id, submission_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::SubmissionNotFound, "Submission not found")
            })
    }

    pub async fn delete_submission(
        &self,
        user_id: Uuid,
        form_id: Uuid,
        submission_id: Uuid,
    ) -> Result<(), DomainError> {
        self.require_owned(user_id, form_id).await?;
        if !self.submissions.delete(form_id, submission_id).await? {
            return Err(DomainError::new(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            ));
        }
        Ok(())
    }

    /// Bulk delete; returns how many rows were removed.
    pub async fn delete_submissions(
        &self,
        user_id: Uuid,
        form_id: Uuid,
        ids: &[Uuid],
    ) -> Result<u64, DomainError> {
        self.require_owned(user_id, form_id).await?;
        self.submissions.delete_many(form_id, ids).await
    }

    /// Export all of a form's submissions as CSV. Returns the form title
    /// (for the attachment filename) and the CSV body.
    pub async fn export_csv(
        &self,
        user_id: Uuid,
        form_id: Uuid,
    ) -> Result<(String, String), DomainError> {
        let form = self.require_owned(user_id, form_id).await?;
        let fields = self.forms.fields(form_id).await?;
        let submissions = self.submissions.list_all(form_id).await?;
        Ok((form.title, submissions_to_csv(&fields, &submissions)))
    }

    pub async fn dashboard(&self, user_id: Uuid) -> Result<DashboardStats, DomainError> {
        self.stats.dashboard(user_id).await
    }

    pub async fn usage(&self, user_id: Uuid) -> Result<UsageReport, DomainError> {
        let UsageStats {
            forms_used,
            submissions_this_month,
        } = self.stats.usage(user_id).await?;
        let plan = self.user_plan(user_id).await?;
        let (form_limit, submission_limit) = match &plan {
            Some(p) => (i64::from(p.form_limit), i64::from(p.submission_limit_monthly)),
            None => (FREE_FORM_LIMIT, FREE_SUBMISSION_LIMIT),
        };
        Ok(UsageReport {
            forms_used,
            form_limit,
            submissions_this_month,
            submission_limit_monthly: submission_limit,
        })
    }

    async fn form_limit(&self, user_id: Uuid) -> Result<i64, DomainError> {
        Ok(self
            .user_plan(user_id)
            .await?
            .map(|p| i64::from(p.form_limit))
            .unwrap_or(FREE_FORM_LIMIT))
    }

    async fn user_plan(&self, user_id: Uuid) -> Result<Option<Plan>, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?;
        match user.plan_id {
            Some(plan_id) if user.has_active_subscription(chrono::Utc::now()) => {
                self.plans.find_by_id(plan_id).await
            }
            _ => Ok(None),
        }
    }

    /// Ownership check: a form belonging to someone else is reported as
    /// absent, not forbidden.
    async fn require_owned(&self, user_id: Uuid, form_id: Uuid) -> Result<Form, DomainError> {
        self.forms
            .find_for_owner(form_id, user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::FormNotFound, "Form not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::subscription::{NewPlan, SubscriptionStatus, FREE_TIER};
    use crate::domain::users::User;
    use crate::ports::{DailyCount, FormCount};

    #[derive(Default)]
    struct State {
        users: HashMap<Uuid, User>,
        plans: HashMap<Uuid, Plan>,
        forms: HashMap<Uuid, Form>,
        fields: HashMap<Uuid, Vec<FormField>>,
        submissions: Vec<Submission>,
    }

    #[derive(Default)]
    struct Backend {
        state: Mutex<State>,
    }

    impl Backend {
        fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
            f(&mut self.state.lock().unwrap())
        }
    }

    #[async_trait]
    impl FormRepository for Backend {
        async fn create(&self, form: &NewForm) -> Result<Form, DomainError> {
            let created = Form {
                id: Uuid::new_v4(),
                user_id: form.user_id,
                title: form.title.clone(),
                description: form.description.clone(),
                endpoint_id: form.endpoint_id.clone(),
                redirect_url: form.redirect_url.clone(),
                spam_protection: form.spam_protection,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            let fields = form
                .fields
                .iter()
                .enumerate()
                .map(|(i, spec)| FormField {
                    id: Uuid::new_v4(),
                    form_id: created.id,
                    name: spec.name.clone(),
                    label: spec.label.clone(),
                    field_type: spec.field_type.clone(),
                    required: spec.required,
                    position: i as i32,
                    options: spec.options.clone(),
                })
                .collect();
            self.with(|s| {
                s.forms.insert(created.id, created.clone());
                s.fields.insert(created.id, fields);
            });
            Ok(created)
        }

        async fn list_for_owner(&self, user_id: Uuid) -> Result<Vec<Form>, DomainError> {
            Ok(self.with(|s| {
                s.forms
                    .values()
                    .filter(|f| f.user_id == user_id)
                    .cloned()
                    .collect()
            }))
        }

        async fn find_for_owner(
            &self,
            form_id: Uuid,
            user_id: Uuid,
        ) -> Result<Option<Form>, DomainError> {
            Ok(self.with(|s| {
                s.forms
                    .get(&form_id)
                    .filter(|f| f.user_id == user_id)
                    .cloned()
            }))
        }

        async fn find_by_endpoint(&self, endpoint_id: &str) -> Result<Option<Form>, DomainError> {
            Ok(self.with(|s| {
                s.forms
                    .values()
                    .find(|f| f.endpoint_id == endpoint_id)
                    .cloned()
            }))
        }

        async fn fields(&self, form_id: Uuid) -> Result<Vec<FormField>, DomainError> {
            Ok(self.with(|s| s.fields.get(&form_id).cloned().unwrap_or_default()))
        }

        async fn update(&self, form_id: Uuid, update: &FormUpdate) -> Result<(), DomainError> {
            self.with(|s| {
                let form = s.forms.get_mut(&form_id).unwrap();
                form.title = update.title.clone();
                form.description = update.description.clone();
                form.redirect_url = update.redirect_url.clone();
                form.spam_protection = update.spam_protection;
                let fields = update
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(i, spec)| FormField {
                        id: Uuid::new_v4(),
                        form_id,
                        name: spec.name.clone(),
                        label: spec.label.clone(),
                        field_type: spec.field_type.clone(),
                        required: spec.required,
                        position: i as i32,
                        options: spec.options.clone(),
                    })
                    .collect();
                s.fields.insert(form_id, fields);
            });
            Ok(())
        }

        async fn delete(&self, form_id: Uuid) -> Result<(), DomainError> {
            self.with(|s| {
                s.forms.remove(&form_id);
                s.fields.remove(&form_id);
                s.submissions.retain(|sub| sub.form_id != form_id);
            });
            Ok(())
        }

        async fn count_for_owner(&self, user_id: Uuid) -> Result<i64, DomainError> {
            Ok(self.with(|s| s.forms.values().filter(|f| f.user_id == user_id).count() as i64))
        }
    }

    #[async_trait]
    impl SubmissionRepository for Backend {
        async fn insert(&self, submission: &NewSubmission) -> Result<Submission, DomainError> {
            let created = Submission {
                id: Uuid::new_v4(),
                form_id: submission.form_id,
                data: submission.data.clone(),
                ip_address: submission.ip_address.clone(),
                user_agent: submission.user_agent.clone(),
                created_at: Utc::now(),
            };
            self.with(|s| s.submissions.push(created.clone()));
            Ok(created)
        }

        async fn list(
            &self,
            form_id: Uuid,
            page: Page,
        ) -> Result<(Vec<Submission>, i64), DomainError> {
            let all: Vec<Submission> = self.with(|s| {
                s.submissions
                    .iter()
                    .filter(|sub| sub.form_id == form_id)
                    .cloned()
                    .collect()
            });
            let total = all.len() as i64;
            let items = all
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit as usize)
                .collect();
            Ok((items, total))
        }

        async fn list_all(&self, form_id: Uuid) -> Result<Vec<Submission>, DomainError> {
            Ok(self.with(|s| {
                s.submissions
                    .iter()
                    .filter(|sub| sub.form_id == form_id)
                    .cloned()
                    .collect()
            }))
        }

        async fn find(
            &self,
            form_id: Uuid,
            submission_id: Uuid,
        ) -> Result<Option<Submission>, DomainError> {
            Ok(self.with(|s| {
                s.submissions
                    .iter()
                    .find(|sub| sub.form_id == form_id && sub.id == submission_id)
                    .cloned()
            }))
        }

        async fn delete(&self, form_id: Uuid, submission_id: Uuid) -> Result<bool, DomainError> {
            Ok(self.with(|s| {
                let before = s.submissions.len();
                s.submissions
                    .retain(|sub| !(sub.form_id == form_id && sub.id == submission_id));
                s.submissions.len() != before
            }))
        }

        async fn delete_many(&self, form_id: Uuid, ids: &[Uuid]) -> Result<u64, DomainError> {
            Ok(self.with(|s| {
                let before = s.submissions.len();
                s.submissions
                    .retain(|sub| !(sub.form_id == form_id && ids.contains(&sub.id)));
                (before - s.submissions.len()) as u64
            }))
        }
    }

    #[async_trait]
    impl StatsReader for Backend {
        async fn dashboard(&self, user_id: Uuid) -> Result<DashboardStats, DomainError> {
            let usage = self.usage(user_id).await?;
            Ok(DashboardStats {
                total_forms: usage.forms_used,
                total_submissions: usage.submissions_this_month,
                submissions_this_month: usage.submissions_this_month,
                submissions_by_day: Vec::<DailyCount>::new(),
                top_forms: Vec::<FormCount>::new(),
            })
        }

        async fn usage(&self, user_id: Uuid) -> Result<UsageStats, DomainError> {
            Ok(self.with(|s| {
                let form_ids: Vec<Uuid> = s
                    .forms
                    .values()
                    .filter(|f| f.user_id == user_id)
                    .map(|f| f.id)
                    .collect();
                UsageStats {
                    forms_used: form_ids.len() as i64,
                    submissions_this_month: s
                        .submissions
                        .iter()
                        .filter(|sub| form_ids.contains(&sub.form_id))
                        .count() as i64,
                }
            }))
        }
    }

    #[async_trait]
    impl UserRepository for Backend {
        async fn create(
            &self,
            _user: &crate::domain::users::NewUser,
        ) -> Result<User, DomainError> {
            unimplemented!("not used in these tests")
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
            Ok(self.with(|s| s.users.get(&id).cloned()))
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn count_on_plan(&self, _plan_id: Uuid) -> Result<i64, DomainError> {
            Ok(0)
        }
    }

    #[async_trait]
    impl PlanRepository for Backend {
        async fn list(&self) -> Result<Vec<Plan>, DomainError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Plan>, DomainError> {
            Ok(self.with(|s| s.plans.get(&id).cloned()))
        }

        async fn create(&self, _plan: &NewPlan) -> Result<Plan, DomainError> {
            unimplemented!("not used in these tests")
        }

        async fn update(&self, _id: Uuid, _plan: &NewPlan) -> Result<Plan, DomainError> {
            unimplemented!("not used in these tests")
        }

        async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
            unimplemented!("not used in these tests")
        }
    }

    fn service(backend: &std::sync::Arc<Backend>) -> FormService {
        FormService::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
        )
    }

    fn seed_free_user(backend: &std::sync::Arc<Backend>) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            subscription_tier: FREE_TIER.to_string(),
            subscription_status: SubscriptionStatus::None,
            plan_id: None,
            gateway_subscription_id: None,
            subscription_start_date: None,
            subscription_end_date: None,
            created_at: Utc::now(),
        };
        let id = user.id;
        backend.with(|s| s.users.insert(id, user));
        id
    }

    fn form_input(title: &str, spam_protection: bool, redirect: Option<&str>) -> FormInput {
        FormInput {
            title: title.to_string(),
            description: None,
            redirect_url: redirect.map(|s| s.to_string()),
            spam_protection,
            fields: vec![FieldSpec {
                name: "name".to_string(),
                label: "Name".to_string(),
                field_type: "text".to_string(),
                required: true,
                options: None,
            }],
        }
    }

    fn object(value: serde_json::Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn honeypot_submission_succeeds_without_storing() {
        let backend = std::sync::Arc::new(Backend::default());
        let svc = service(&backend);
        let user_id = seed_free_user(&backend);
        let detail = svc
            .create_form(user_id, form_input("Contact", true, Some("https://done.example")))
            .await
            .unwrap();

        let outcome = svc
            .intake(
                &detail.form.endpoint_id,
                object(json!({ "_gotcha": "gotcha!", "name": "Bot" })),
                None,
                None,
            )
            .await
            .unwrap();

        assert!(!outcome.stored);
        assert_eq!(outcome.redirect_url.as_deref(), Some("https://done.example"));
        assert!(backend.with(|s| s.submissions.is_empty()));
    }

    #[tokio::test]
    async fn honeypot_ignored_when_spam_protection_off() {
        let backend = std::sync::Arc::new(Backend::default());
        let svc = service(&backend);
        let user_id = seed_free_user(&backend);
        let detail = svc
            .create_form(user_id, form_input("Contact", false, None))
            .await
            .unwrap();

        let outcome = svc
            .intake(
                &detail.form.endpoint_id,
                object(json!({ "_gotcha": "filled", "name": "Asha" })),
                None,
                None,
            )
            .await
            .unwrap();

        assert!(outcome.stored);
        // Underscore keys are still stripped before storage
        let stored = backend.with(|s| s.submissions[0].data.clone());
        assert!(stored.get("_gotcha").is_none());
        assert_eq!(stored.get("name"), Some(&json!("Asha")));
    }

    #[tokio::test]
    async fn intake_records_ip_and_user_agent() {
        let backend = std::sync::Arc::new(Backend::default());
        let svc = service(&backend);
        let user_id = seed_free_user(&backend);
        let detail = svc
            .create_form(user_id, form_input("Contact", true, None))
            .await
            .unwrap();

        svc.intake(
            &detail.form.endpoint_id,
            object(json!({ "name": "Asha" })),
            Some("203.0.113.9".to_string()),
            Some("curl/8.0".to_string()),
        )
        .await
        .unwrap();

        backend.with(|s| {
            assert_eq!(s.submissions[0].ip_address.as_deref(), Some("203.0.113.9"));
            assert_eq!(s.submissions[0].user_agent.as_deref(), Some("curl/8.0"));
        });
    }

    #[tokio::test]
    async fn intake_to_unknown_endpoint_is_not_found() {
        let backend = std::sync::Arc::new(Backend::default());
        let svc = service(&backend);

        let err = svc
            .intake("missing", object(json!({ "name": "x" })), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FormNotFound);
    }

    #[tokio::test]
    async fn foreign_form_reads_as_absent() {
        let backend = std::sync::Arc::new(Backend::default());
        let svc = service(&backend);
        let owner = seed_free_user(&backend);
        let other = seed_free_user(&backend);
        let detail = svc
            .create_form(owner, form_input("Contact", true, None))
            .await
            .unwrap();

        let err = svc.form_detail(other, detail.form.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::FormNotFound);
    }

    #[tokio::test]
    async fn free_tier_form_limit_is_enforced() {
        let backend = std::sync::Arc::new(Backend::default());
        let svc = service(&backend);
        let user_id = seed_free_user(&backend);

        for i in 0..3 {
            svc.create_form(user_id, form_input(&format!("Form {}", i), true, None))
                .await
                .unwrap();
        }
        let err = svc
            .create_form(user_id, form_input("One too many", true, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn expired_subscription_falls_back_to_free_limits() {
        let backend = std::sync::Arc::new(Backend::default());
        let svc = service(&backend);
        let user_id = seed_free_user(&backend);
        let plan = Plan {
            id: Uuid::new_v4(),
            name: "pro".to_string(),
            monthly_price: 500,
            yearly_price: 5000,
            form_limit: 50,
            submission_limit_monthly: 10_000,
            custom_redirect: true,
            file_uploads: false,
            priority_support: false,
            created_at: Utc::now(),
        };
        backend.with(|s| {
            s.plans.insert(plan.id, plan.clone());
            let user = s.users.get_mut(&user_id).unwrap();
            user.plan_id = Some(plan.id);
            user.subscription_status = SubscriptionStatus::Active;
            user.subscription_end_date = Some(Utc::now() - Duration::days(1));
        });

        let report = svc.usage(user_id).await.unwrap();
        assert_eq!(report.form_limit, FREE_FORM_LIMIT);
    }

    #[tokio::test]
    async fn update_replaces_fields_wholesale() {
        let backend = std::sync::Arc::new(Backend::default());
        let svc = service(&backend);
        let user_id = seed_free_user(&backend);
        let detail = svc
            .create_form(user_id, form_input("Contact", true, None))
            .await
            .unwrap();

        let mut input = form_input("Contact v2", true, None);
        input.fields = vec![
            FieldSpec {
                name: "email".to_string(),
                label: "Email".to_string(),
                field_type: "email".to_string(),
                required: true,
                options: None,
            },
            FieldSpec {
                name: "message".to_string(),
                label: "Message".to_string(),
                field_type: "textarea".to_string(),
                required: false,
                options: None,
            },
        ];

        let updated = svc.update_form(user_id, detail.form.id, input).await.unwrap();
        assert_eq!(updated.form.title, "Contact v2");
        assert_eq!(updated.fields.len(), 2);
        assert_eq!(updated.fields[0].name, "email");
        assert_eq!(updated.fields[1].position, 1);
    }

    #[tokio::test]
    async fn bulk_delete_reports_count() {
        let backend = std::sync::Arc::new(Backend::default());
        let svc = service(&backend);
        let user_id = seed_free_user(&backend);
        let detail = svc
            .create_form(user_id, form_input("Contact", false, None))
            .await
            .unwrap();

        for i in 0..3 {
            svc.intake(
                &detail.form.endpoint_id,
                object(json!({ "name": format!("v{}", i) })),
                None,
                None,
            )
            .await
            .unwrap();
        }
        let ids: Vec<Uuid> = backend.with(|s| s.submissions.iter().take(2).map(|x| x.id).collect());

        let deleted = svc
            .delete_submissions(user_id, detail.form.id, &ids)
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(backend.with(|s| s.submissions.len()), 1);
    }
}
