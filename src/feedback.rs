//! Loading and saving a tester's feedback for one tag.

use crate::models::session::Session;
use crate::models::tester::{FeedbackDraft, NewFeedback, TesterFeedback, TesterTag};
use crate::supabase::{AuthGateway, BackendError, TesterStore};
use leptos::logging::{log, warn};

/// What `/tester/{code}` shows once loading finishes.
#[derive(Debug, Clone, PartialEq)]
pub enum TesterView {
    NotFound,
    /// Tag exists but nobody is signed in.
    Welcome { tag: TesterTag },
    Form {
        tag: TesterTag,
        existing: Option<TesterFeedback>,
        user_id: String,
        display_name: String,
    },
}

impl TesterView {
    /// The view to show now. A signed-out result is held back while a sign-in is still
    /// completing, so the page keeps loading instead of starting the app handoff.
    pub fn settled(self, sign_in_pending: bool) -> Option<TesterView> {
        match self {
            TesterView::Welcome { .. } if sign_in_pending => None,
            view => Some(view),
        }
    }
}

pub async fn load_tester_view<B>(backend: &B, code: &str) -> Result<TesterView, BackendError>
where
    B: AuthGateway + TesterStore,
{
    let Some(tag) = backend.find_tag(code.trim()).await? else {
        log!("[FEEDBACK] No tester tag for code {}", code);
        return Ok(TesterView::NotFound);
    };
    let Some(session) = backend.get_session() else {
        return Ok(TesterView::Welcome { tag });
    };
    let user_id = session.user_id().to_string();
    let existing = backend.find_feedback(&tag.id, &user_id).await?;
    let display_name = resolve_display_name(backend, &session).await;
    Ok(TesterView::Form { tag, existing, user_id, display_name })
}

/// Profile name, then e-mail, then "Anonymous". A failed profile read is not fatal.
async fn resolve_display_name<T: TesterStore>(store: &T, session: &Session) -> String {
    let profile = match store.display_name(session.user_id()).await {
        Ok(name) => name,
        Err(e) => {
            warn!("[FEEDBACK] Profile lookup failed: {}", e);
            None
        }
    };
    profile
        .or_else(|| session.user.email.clone().filter(|e| !e.is_empty()))
        .unwrap_or_else(|| "Anonymous".to_string())
}

/// Writes the draft: update when a row already exists for this tester, insert otherwise.
/// The error is the inline message for the form.
pub async fn save_feedback<T: TesterStore>(
    store: &T,
    tag: &TesterTag,
    user_id: &str,
    existing: Option<&TesterFeedback>,
    draft: &FeedbackDraft,
    display_name: &str,
) -> Result<(), String> {
    let fields = draft.to_fields(display_name);
    let result = match existing {
        Some(row) => store.update_feedback(&row.id, &fields).await,
        None => {
            let row = NewFeedback {
                tester_tag_id: tag.id.clone(),
                tester_id: user_id.to_string(),
                fields,
            };
            store.insert_feedback(&row).await
        }
    };
    result.map_err(|e| {
        warn!("[FEEDBACK] Save failed for tag {}: {}", tag.code, e);
        e.user_message("Failed to save")
    })
}

pub fn submit_label(has_existing: bool, saving: bool) -> &'static str {
    match (saving, has_existing) {
        (true, _) => "Saving...",
        (false, true) => "Update Feedback",
        (false, false) => "Submit Feedback",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::User;
    use crate::models::tester::{FeedbackFields, RatingCategory};
    use crate::supabase::OAuthProvider;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Write {
        Insert(NewFeedback),
        Update(String, FeedbackFields),
    }

    #[derive(Default)]
    struct FakeBackend {
        tags: Vec<TesterTag>,
        feedback: Vec<TesterFeedback>,
        profile_name: Option<String>,
        profile_fails: bool,
        session: Option<Session>,
        write_error: Option<BackendError>,
        writes: RefCell<Vec<Write>>,
    }

    impl AuthGateway for FakeBackend {
        async fn sign_in_with_password(&self, _: &str, _: &str) -> Result<Session, BackendError> {
            Err(BackendError::NoSession)
        }
        async fn sign_up(&self, _: &str, _: &str, _: serde_json::Value) -> Result<Option<Session>, BackendError> {
            Ok(None)
        }
        fn oauth_authorize_url(&self, _: OAuthProvider, _: &str) -> String {
            String::new()
        }
        async fn exchange_code_for_session(&self, _: &str) -> Result<Session, BackendError> {
            Err(BackendError::MissingVerifier)
        }
        fn get_session(&self) -> Option<Session> {
            self.session.clone()
        }
        fn sign_out(&self) {}
    }

    impl TesterStore for FakeBackend {
        async fn find_tag(&self, code: &str) -> Result<Option<TesterTag>, BackendError> {
            Ok(self.tags.iter().find(|t| t.code == code).cloned())
        }
        async fn find_feedback(&self, tag_id: &str, user_id: &str) -> Result<Option<TesterFeedback>, BackendError> {
            Ok(self
                .feedback
                .iter()
                .find(|f| f.tester_tag_id == tag_id && f.tester_id == user_id)
                .cloned())
        }
        async fn display_name(&self, _: &str) -> Result<Option<String>, BackendError> {
            if self.profile_fails {
                return Err(BackendError::Network("offline".into()));
            }
            Ok(self.profile_name.clone())
        }
        async fn insert_feedback(&self, row: &NewFeedback) -> Result<(), BackendError> {
            if let Some(e) = &self.write_error {
                return Err(e.clone());
            }
            self.writes.borrow_mut().push(Write::Insert(row.clone()));
            Ok(())
        }
        async fn update_feedback(&self, id: &str, fields: &FeedbackFields) -> Result<(), BackendError> {
            if let Some(e) = &self.write_error {
                return Err(e.clone());
            }
            self.writes.borrow_mut().push(Write::Update(id.to_string(), fields.clone()));
            Ok(())
        }
    }

    fn tag() -> TesterTag {
        TesterTag {
            id: "tag-1".into(),
            pheno_id: "pheno-1".into(),
            owner_id: "owner-1".into(),
            code: "ABCD1234".into(),
            strain_name: Some("Zkittlez".into()),
            pheno_number: Some(3),
            created_at: String::new(),
        }
    }

    fn session(email: Option<&str>) -> Session {
        Session {
            access_token: "jwt".into(),
            refresh_token: String::new(),
            token_type: "bearer".into(),
            expires_in: None,
            expires_at: None,
            user: User { id: "user-1".into(), email: email.map(str::to_string), user_metadata: serde_json::Value::Null },
        }
    }

    fn stored_row() -> TesterFeedback {
        TesterFeedback {
            id: "fb-1".into(),
            tester_tag_id: "tag-1".into(),
            tester_id: "user-1".into(),
            fields: FeedbackFields { overall_rating: Some(2), ..FeedbackFields::default() },
        }
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let backend = FakeBackend { tags: vec![tag()], ..FakeBackend::default() };
        assert_eq!(load_tester_view(&backend, "ZZZZ0000").await, Ok(TesterView::NotFound));
    }

    #[tokio::test]
    async fn signed_out_visit_gets_the_welcome_view() {
        let backend = FakeBackend { tags: vec![tag()], ..FakeBackend::default() };
        assert_eq!(
            load_tester_view(&backend, "ABCD1234").await,
            Ok(TesterView::Welcome { tag: tag() })
        );
        assert!(backend.writes.borrow().is_empty());
    }

    #[tokio::test]
    async fn welcome_waits_while_a_code_is_being_exchanged() {
        let backend = FakeBackend { tags: vec![tag()], ..FakeBackend::default() };
        let view = load_tester_view(&backend, "ABCD1234").await.unwrap();
        assert_eq!(view.clone().settled(true), None);
        assert_eq!(view.settled(false), Some(TesterView::Welcome { tag: tag() }));
        assert_eq!(TesterView::NotFound.settled(true), Some(TesterView::NotFound));
    }

    #[tokio::test]
    async fn signed_in_visit_prefills_from_existing_row() {
        let backend = FakeBackend {
            tags: vec![tag()],
            feedback: vec![stored_row()],
            profile_name: Some("Tess".into()),
            session: Some(session(Some("tess@example.com"))),
            ..FakeBackend::default()
        };
        let view = load_tester_view(&backend, "ABCD1234").await.unwrap();
        assert_eq!(
            view,
            TesterView::Form {
                tag: tag(),
                existing: Some(stored_row()),
                user_id: "user-1".into(),
                display_name: "Tess".into(),
            }
        );
    }

    #[tokio::test]
    async fn display_name_falls_back_to_email_then_anonymous() {
        let with_email = FakeBackend {
            tags: vec![tag()],
            profile_fails: true,
            session: Some(session(Some("tess@example.com"))),
            ..FakeBackend::default()
        };
        match load_tester_view(&with_email, "ABCD1234").await {
            Ok(TesterView::Form { display_name, existing, .. }) => {
                assert_eq!(display_name, "tess@example.com");
                assert_eq!(existing, None);
            }
            other => panic!("unexpected view {:?}", other),
        }

        let bare = FakeBackend { tags: vec![tag()], session: Some(session(None)), ..FakeBackend::default() };
        match load_tester_view(&bare, "ABCD1234").await {
            Ok(TesterView::Form { display_name, .. }) => assert_eq!(display_name, "Anonymous"),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test]
    async fn first_save_inserts_with_tag_and_tester() {
        let backend = FakeBackend::default();
        let mut draft = FeedbackDraft::default();
        draft.set_rating(RatingCategory::Overall, 5);

        save_feedback(&backend, &tag(), "user-1", None, &draft, "Tess").await.unwrap();

        let writes = backend.writes.borrow();
        assert_eq!(writes.len(), 1);
        match &writes[0] {
            Write::Insert(row) => {
                assert_eq!(row.tester_tag_id, "tag-1");
                assert_eq!(row.tester_id, "user-1");
                assert_eq!(row.fields.overall_rating, Some(5));
                assert_eq!(row.fields.tester_display_name.as_deref(), Some("Tess"));
            }
            other => panic!("expected insert, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn existing_row_is_updated_by_id() {
        let backend = FakeBackend::default();
        let existing = stored_row();
        let mut draft = FeedbackDraft::from_existing(Some(&existing));
        draft.set_rating(RatingCategory::Overall, 4);

        save_feedback(&backend, &tag(), "user-1", Some(&existing), &draft, "Tess").await.unwrap();

        let writes = backend.writes.borrow();
        assert_eq!(writes.len(), 1);
        match &writes[0] {
            Write::Update(id, fields) => {
                assert_eq!(id, "fb-1");
                assert_eq!(fields.overall_rating, Some(4));
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn save_errors_become_inline_messages() {
        let refused = FakeBackend {
            write_error: Some(BackendError::Api("new row violates row-level security policy".into())),
            ..FakeBackend::default()
        };
        let draft = FeedbackDraft::default();
        assert_eq!(
            save_feedback(&refused, &tag(), "user-1", None, &draft, "Tess").await,
            Err("new row violates row-level security policy".to_string())
        );

        let offline = FakeBackend {
            write_error: Some(BackendError::Network("failed to fetch".into())),
            ..FakeBackend::default()
        };
        assert_eq!(
            save_feedback(&offline, &tag(), "user-1", None, &draft, "Tess").await,
            Err("Failed to save".to_string())
        );
    }

    #[test]
    fn submit_button_labels() {
        assert_eq!(submit_label(false, false), "Submit Feedback");
        assert_eq!(submit_label(true, false), "Update Feedback");
        assert_eq!(submit_label(true, true), "Saving...");
    }
}
