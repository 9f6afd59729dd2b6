//! Content service: CRUD over the three collections plus image lifecycle.
//!
//! Image fields follow one rule: a persisted reference is never a staged
//! upload. Staged references are finalized before the record is written,
//! and permanent files a record stops referencing are deleted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use super::memory::MemoryRepository;
use super::repository::SharedRepository;
use super::types::{
    new_id, Challenge, ChallengeFilter, ChallengeInput, Ctf, CtfInput, TeamMember,
    TeamMemberInput, PLACEHOLDER_AVATAR,
};
use crate::upload::{FinalizeRequest, UploadRef, UploadStore};
use crate::{Result, SiteError};

/// Flatten validator errors into a single message, sorted by field.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: invalid ({})", e.code),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

fn validate_input<T: Validate>(input: &T) -> Result<()> {
    input
        .validate()
        .map_err(|e| SiteError::Validation(validation_message(&e)))
}

/// Outcome of resolving a requested image reference.
struct ResolvedImage {
    /// Value to persist.
    url: String,
    /// Permanent file to delete once the record is saved.
    retire: Option<String>,
}

/// The permanent upload filename behind a stored reference, if any.
fn permanent_filename(url: Option<&str>) -> Option<String> {
    match url.and_then(UploadRef::from_url) {
        Some(UploadRef::Permanent(name)) => Some(name),
        _ => None,
    }
}

/// Content service.
#[derive(Clone)]
pub struct ContentService {
    ctfs: SharedRepository<Ctf>,
    challenges: SharedRepository<Challenge>,
    members: SharedRepository<TeamMember>,
    uploads: UploadStore,
}

impl ContentService {
    pub fn new(
        ctfs: SharedRepository<Ctf>,
        challenges: SharedRepository<Challenge>,
        members: SharedRepository<TeamMember>,
        uploads: UploadStore,
    ) -> Self {
        Self {
            ctfs,
            challenges,
            members,
            uploads,
        }
    }

    /// Service over fresh in-memory repositories.
    pub fn in_memory(uploads: UploadStore) -> Self {
        Self::new(
            Arc::new(MemoryRepository::new()),
            Arc::new(MemoryRepository::new()),
            Arc::new(MemoryRepository::new()),
            uploads,
        )
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    // ------------------------------------------------------------------
    // Image lifecycle
    // ------------------------------------------------------------------

    /// Turn a requested reference into a persistable one.
    async fn resolve_image(&self, requested: &str, previous: Option<&str>) -> Result<ResolvedImage> {
        let previous_file = permanent_filename(previous);

        // The replaced file is retired by the caller after the record is
        // written, so a failed write still points at an existing file.
        if let Some(UploadRef::Staged(temp_filename)) = UploadRef::from_url(requested) {
            let request = FinalizeRequest::new(temp_filename);
            let stored = self.uploads.finalize(&request).await.map_err(|e| match e {
                SiteError::NotFound(_) => SiteError::Validation(
                    "Uploaded image has expired, please upload it again.".to_string(),
                ),
                other => other,
            })?;
            return Ok(ResolvedImage {
                retire: previous_file.filter(|old| *old != stored.filename),
                url: stored.url,
            });
        }

        let retire = previous_file.filter(|_| previous != Some(requested));
        Ok(ResolvedImage {
            url: requested.to_string(),
            retire,
        })
    }

    /// Best-effort deletion of a permanent upload.
    async fn retire_image(&self, filename: Option<String>) {
        let Some(filename) = filename else {
            return;
        };
        match self.uploads.delete_permanent(&filename).await {
            Ok(()) => info!(filename = %filename, "Deleted unreferenced image"),
            Err(SiteError::NotFound(_)) => {}
            Err(e) => warn!(filename = %filename, "Failed to delete unreferenced image: {e}"),
        }
    }

    // ------------------------------------------------------------------
    // CTFs
    // ------------------------------------------------------------------

    pub async fn list_ctfs(&self) -> Result<Vec<Ctf>> {
        self.ctfs.find_all().await
    }

    pub async fn get_ctf(&self, id: &str) -> Result<Ctf> {
        self.ctfs
            .find_by_id(id)
            .await?
            .ok_or_else(|| SiteError::NotFound("CTF".to_string()))
    }

    pub async fn get_ctf_by_slug(&self, slug: &str) -> Result<Ctf> {
        self.ctfs
            .find_all()
            .await?
            .into_iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| SiteError::NotFound("CTF".to_string()))
    }

    async fn ensure_unique_slug(&self, slug: &str, except_id: Option<&str>) -> Result<()> {
        let taken = self
            .ctfs
            .find_all()
            .await?
            .iter()
            .any(|c| c.slug == slug && Some(c.id.as_str()) != except_id);
        if taken {
            return Err(SiteError::Conflict(format!("Slug '{slug}' is already in use")));
        }
        Ok(())
    }

    pub async fn create_ctf(&self, input: CtfInput) -> Result<Ctf> {
        validate_input(&input)?;
        self.ensure_unique_slug(&input.slug, None).await?;

        let image = self.resolve_image(&input.banner_url, None).await?;
        let now = Utc::now();
        let ctf = self
            .ctfs
            .insert(Ctf {
                id: new_id(),
                slug: input.slug,
                name: input.name,
                description: input.description,
                banner_url: image.url,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(id = %ctf.id, slug = %ctf.slug, "Created CTF");
        Ok(ctf)
    }

    pub async fn update_ctf(&self, id: &str, input: CtfInput) -> Result<Ctf> {
        validate_input(&input)?;
        let existing = self.get_ctf(id).await?;
        self.ensure_unique_slug(&input.slug, Some(id)).await?;

        let image = self
            .resolve_image(&input.banner_url, Some(existing.banner_url.as_str()))
            .await?;
        let ctf = self
            .ctfs
            .update(Ctf {
                slug: input.slug,
                name: input.name,
                description: input.description,
                banner_url: image.url,
                updated_at: Utc::now(),
                ..existing
            })
            .await?
            .ok_or_else(|| SiteError::NotFound("CTF".to_string()))?;
        self.retire_image(image.retire).await;

        info!(id = %ctf.id, "Updated CTF");
        Ok(ctf)
    }

    /// Delete a CTF together with its challenges and all their images.
    pub async fn delete_ctf(&self, id: &str) -> Result<()> {
        let ctf = self.get_ctf(id).await?;

        let challenges = self.list_challenges(&ChallengeFilter::for_ctf(id)).await?;
        for challenge in &challenges {
            self.remove_challenge(challenge).await?;
        }

        if !self.ctfs.delete(id).await? {
            return Err(SiteError::NotFound("CTF".to_string()));
        }
        self.retire_image(permanent_filename(Some(ctf.banner_url.as_str())))
            .await;

        info!(id = %id, challenges = challenges.len(), "Deleted CTF");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Challenges
    // ------------------------------------------------------------------

    pub async fn list_challenges(&self, filter: &ChallengeFilter) -> Result<Vec<Challenge>> {
        Ok(self
            .challenges
            .find_all()
            .await?
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect())
    }

    pub async fn get_challenge(&self, id: &str) -> Result<Challenge> {
        self.challenges
            .find_by_id(id)
            .await?
            .ok_or_else(|| SiteError::NotFound("Challenge".to_string()))
    }

    async fn ensure_ctf_exists(&self, ctf_id: &str) -> Result<()> {
        if self.ctfs.find_by_id(ctf_id).await?.is_none() {
            return Err(SiteError::Validation(format!(
                "ctf_id: CTF {ctf_id} does not exist"
            )));
        }
        Ok(())
    }

    pub async fn create_challenge(&self, input: ChallengeInput) -> Result<Challenge> {
        validate_input(&input)?;
        self.ensure_ctf_exists(&input.ctf_id).await?;

        let requested = input.image_url.unwrap_or_default();
        let image = self.resolve_image(&requested, None).await?;
        let now = Utc::now();
        let challenge = self
            .challenges
            .insert(Challenge {
                id: new_id(),
                ctf_id: input.ctf_id,
                title: input.title,
                category: input.category,
                description: input.description,
                writeup: input.writeup,
                image_url: Some(image.url).filter(|u| !u.is_empty()),
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(id = %challenge.id, ctf_id = %challenge.ctf_id, "Created challenge");
        Ok(challenge)
    }

    pub async fn update_challenge(&self, id: &str, input: ChallengeInput) -> Result<Challenge> {
        validate_input(&input)?;
        let existing = self.get_challenge(id).await?;
        self.ensure_ctf_exists(&input.ctf_id).await?;

        let requested = input.image_url.unwrap_or_default();
        let image = self
            .resolve_image(&requested, existing.image_url.as_deref())
            .await?;
        let challenge = self
            .challenges
            .update(Challenge {
                ctf_id: input.ctf_id,
                title: input.title,
                category: input.category,
                description: input.description,
                writeup: input.writeup,
                image_url: Some(image.url).filter(|u| !u.is_empty()),
                updated_at: Utc::now(),
                ..existing
            })
            .await?
            .ok_or_else(|| SiteError::NotFound("Challenge".to_string()))?;
        self.retire_image(image.retire).await;

        info!(id = %challenge.id, "Updated challenge");
        Ok(challenge)
    }

    pub async fn delete_challenge(&self, id: &str) -> Result<()> {
        let challenge = self.get_challenge(id).await?;
        self.remove_challenge(&challenge).await?;
        info!(id = %id, "Deleted challenge");
        Ok(())
    }

    async fn remove_challenge(&self, challenge: &Challenge) -> Result<()> {
        if !self.challenges.delete(&challenge.id).await? {
            return Err(SiteError::NotFound("Challenge".to_string()));
        }
        self.retire_image(permanent_filename(challenge.image_url.as_deref()))
            .await;
        Ok(())
    }

    /// Delete challenges whose CTF no longer exists. Returns how many went.
    pub async fn cleanup_orphaned_challenges(&self) -> Result<usize> {
        let ctf_ids: Vec<String> = self
            .ctfs
            .find_all()
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        let orphans: Vec<Challenge> = self
            .challenges
            .find_all()
            .await?
            .into_iter()
            .filter(|c| !ctf_ids.contains(&c.ctf_id))
            .collect();

        for challenge in &orphans {
            self.remove_challenge(challenge).await?;
        }

        if !orphans.is_empty() {
            info!(deleted_count = orphans.len(), "Removed orphaned challenges");
        }
        Ok(orphans.len())
    }

    // ------------------------------------------------------------------
    // Team members
    // ------------------------------------------------------------------

    pub async fn list_members(&self) -> Result<Vec<TeamMember>> {
        self.members.find_all().await
    }

    pub async fn get_member(&self, id: &str) -> Result<TeamMember> {
        self.members
            .find_by_id(id)
            .await?
            .ok_or_else(|| SiteError::NotFound("Team member".to_string()))
    }

    fn avatar_or_placeholder(url: String) -> String {
        if url.is_empty() {
            PLACEHOLDER_AVATAR.to_string()
        } else {
            url
        }
    }

    pub async fn create_member(&self, input: TeamMemberInput) -> Result<TeamMember> {
        validate_input(&input)?;

        let image = self.resolve_image(&input.avatar_url, None).await?;
        let now = Utc::now();
        let member = self
            .members
            .insert(TeamMember {
                id: new_id(),
                name: input.name,
                role: input.role,
                social: input.social,
                avatar_url: Self::avatar_or_placeholder(image.url),
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(id = %member.id, name = %member.name, "Created team member");
        Ok(member)
    }

    pub async fn update_member(&self, id: &str, input: TeamMemberInput) -> Result<TeamMember> {
        validate_input(&input)?;
        let existing = self.get_member(id).await?;

        let image = self
            .resolve_image(&input.avatar_url, Some(existing.avatar_url.as_str()))
            .await?;
        let member = self
            .members
            .update(TeamMember {
                name: input.name,
                role: input.role,
                social: input.social,
                avatar_url: Self::avatar_or_placeholder(image.url),
                updated_at: Utc::now(),
                ..existing
            })
            .await?
            .ok_or_else(|| SiteError::NotFound("Team member".to_string()))?;
        self.retire_image(image.retire).await;

        info!(id = %member.id, "Updated team member");
        Ok(member)
    }

    pub async fn delete_member(&self, id: &str) -> Result<()> {
        let member = self.get_member(id).await?;
        if !self.members.delete(id).await? {
            return Err(SiteError::NotFound("Team member".to_string()));
        }
        self.retire_image(permanent_filename(Some(member.avatar_url.as_str())))
            .await;
        info!(id = %id, "Deleted team member");
        Ok(())
    }

    /// Whether every collection is empty.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.ctfs.count().await? == 0
            && self.challenges.count().await? == 0
            && self.members.count().await? == 0)
    }

    pub(crate) fn ctf_repository(&self) -> &SharedRepository<Ctf> {
        &self.ctfs
    }

    pub(crate) fn challenge_repository(&self) -> &SharedRepository<Challenge> {
        &self.challenges
    }

    pub(crate) fn member_repository(&self) -> &SharedRepository<TeamMember> {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::repository::Repository;
    use crate::content::types::{Category, Social};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::fs;

    fn setup() -> (TempDir, ContentService) {
        let temp_dir = TempDir::new().unwrap();
        let store = UploadStore::new(
            temp_dir.path().join("uploads"),
            5 * 1024 * 1024,
            Duration::from_secs(3600),
        );
        (temp_dir, ContentService::in_memory(store))
    }

    async fn staged(service: &ContentService, name: &str) -> String {
        let dir = service.uploads().temp_dir();
        fs::create_dir_all(dir).await.unwrap();
        fs::write(dir.join(name), b"img").await.unwrap();
        format!("/uploads/temp/{name}")
    }

    async fn permanent(service: &ContentService, name: &str) -> String {
        let dir = service.uploads().uploads_dir();
        fs::create_dir_all(dir).await.unwrap();
        fs::write(dir.join(name), b"img").await.unwrap();
        format!("/uploads/{name}")
    }

    fn ctf_input(slug: &str, banner_url: &str) -> CtfInput {
        CtfInput {
            slug: slug.to_string(),
            name: "FuncTF 2024".to_string(),
            description: "A beginner-friendly CTF.".to_string(),
            banner_url: banner_url.to_string(),
        }
    }

    fn challenge_input(ctf_id: &str, image_url: Option<&str>) -> ChallengeInput {
        ChallengeInput {
            ctf_id: ctf_id.to_string(),
            title: "Web Warmup".to_string(),
            category: Category::Web,
            description: "Find the flag.".to_string(),
            writeup: "# Write-up".to_string(),
            image_url: image_url.map(str::to_string),
        }
    }

    fn member_input(avatar_url: &str) -> TeamMemberInput {
        TeamMemberInput {
            name: "WebSlinger".to_string(),
            role: "Web Exploitation Guru".to_string(),
            social: Social::default(),
            avatar_url: avatar_url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_ctf_finalizes_staged_banner() {
        let (_dir, service) = setup();
        let url = staged(&service, "temp_1700000000000.png").await;

        let ctf = service.create_ctf(ctf_input("functf-2024", &url)).await.unwrap();

        assert_eq!(ctf.banner_url, "/uploads/1700000000000.png");
        assert!(!ctf.banner_url.contains("/uploads/temp/"));
        assert!(service.uploads().permanent_exists("1700000000000.png").await);
        assert!(!service.uploads().staged_exists("temp_1700000000000.png").await);
    }

    #[tokio::test]
    async fn test_create_ctf_with_expired_staged_banner() {
        let (_dir, service) = setup();
        let result = service
            .create_ctf(ctf_input("functf-2024", "/uploads/temp/temp_1.png"))
            .await;
        assert!(matches!(result, Err(SiteError::Validation(_))));
        assert!(service.list_ctfs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_ctf_duplicate_slug() {
        let (_dir, service) = setup();
        service.create_ctf(ctf_input("dup", "")).await.unwrap();
        let result = service.create_ctf(ctf_input("dup", "")).await;
        assert!(matches!(result, Err(SiteError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_ctf_invalid_input_leaves_staged_file() {
        let (_dir, service) = setup();
        let url = staged(&service, "temp_2.png").await;

        let result = service.create_ctf(ctf_input("Bad Slug", &url)).await;

        assert!(matches!(result, Err(SiteError::Validation(_))));
        assert!(service.uploads().staged_exists("temp_2.png").await);
    }

    #[tokio::test]
    async fn test_update_ctf_replacing_banner_deletes_old_file() {
        let (_dir, service) = setup();
        let old = permanent(&service, "old.png").await;
        let ctf = service.create_ctf(ctf_input("event", &old)).await.unwrap();

        let url = staged(&service, "temp_3.png").await;
        let updated = service
            .update_ctf(&ctf.id, ctf_input("event", &url))
            .await
            .unwrap();

        assert_eq!(updated.banner_url, "/uploads/3.png");
        assert!(!service.uploads().permanent_exists("old.png").await);
        assert!(service.uploads().permanent_exists("3.png").await);
        assert_eq!(updated.created_at, ctf.created_at);
    }

    #[tokio::test]
    async fn test_create_ctf_rejects_malformed_upload_paths() {
        let (_dir, service) = setup();
        for banner in [
            "/uploads/temp/",
            "/uploads/temp/sub/temp_1.png",
            "/uploads/temp/.temp_1.png",
        ] {
            let result = service.create_ctf(ctf_input("event", banner)).await;
            assert!(
                matches!(result, Err(SiteError::Validation(_))),
                "{banner} was accepted"
            );
        }
        assert!(service.list_ctfs().await.unwrap().is_empty());
    }

    /// CTF repository whose writes always fail.
    struct FailingUpdates(MemoryRepository<Ctf>);

    #[async_trait::async_trait]
    impl Repository<Ctf> for FailingUpdates {
        async fn find_all(&self) -> Result<Vec<Ctf>> {
            self.0.find_all().await
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Ctf>> {
            self.0.find_by_id(id).await
        }

        async fn insert(&self, record: Ctf) -> Result<Ctf> {
            self.0.insert(record).await
        }

        async fn update(&self, _record: Ctf) -> Result<Option<Ctf>> {
            Err(SiteError::Database("disk I/O error".to_string()))
        }

        async fn delete(&self, id: &str) -> Result<bool> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_banner_file() {
        let (_dir, base) = setup();
        let service = ContentService::new(
            Arc::new(FailingUpdates(MemoryRepository::new())),
            Arc::new(MemoryRepository::new()),
            Arc::new(MemoryRepository::new()),
            base.uploads().clone(),
        );
        let old = permanent(&service, "old.png").await;
        let ctf = service.create_ctf(ctf_input("event", &old)).await.unwrap();

        let url = staged(&service, "temp_3.png").await;
        let result = service.update_ctf(&ctf.id, ctf_input("event", &url)).await;

        assert!(result.is_err());
        assert_eq!(service.get_ctf(&ctf.id).await.unwrap().banner_url, old);
        assert!(service.uploads().permanent_exists("old.png").await);
    }

    #[tokio::test]
    async fn test_update_ctf_to_external_url_deletes_old_file() {
        let (_dir, service) = setup();
        let old = permanent(&service, "old.png").await;
        let ctf = service.create_ctf(ctf_input("event", &old)).await.unwrap();

        service
            .update_ctf(&ctf.id, ctf_input("event", "https://picsum.photos/1200/400"))
            .await
            .unwrap();

        assert!(!service.uploads().permanent_exists("old.png").await);
    }

    #[tokio::test]
    async fn test_update_ctf_unchanged_banner_keeps_file() {
        let (_dir, service) = setup();
        let old = permanent(&service, "keep.png").await;
        let ctf = service.create_ctf(ctf_input("event", &old)).await.unwrap();

        service
            .update_ctf(&ctf.id, ctf_input("event-renamed", &old))
            .await
            .unwrap();

        assert!(service.uploads().permanent_exists("keep.png").await);
        assert_eq!(
            service.get_ctf_by_slug("event-renamed").await.unwrap().id,
            ctf.id
        );
    }

    #[tokio::test]
    async fn test_update_ctf_keeps_own_slug() {
        let (_dir, service) = setup();
        let ctf = service.create_ctf(ctf_input("same", "")).await.unwrap();
        assert!(service.update_ctf(&ctf.id, ctf_input("same", "")).await.is_ok());

        let missing = service.update_ctf("missing", ctf_input("other", "")).await;
        assert!(matches!(missing, Err(SiteError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_ctf_cascades() {
        let (_dir, service) = setup();
        let banner = permanent(&service, "banner.png").await;
        let ctf = service.create_ctf(ctf_input("event", &banner)).await.unwrap();
        let other = service.create_ctf(ctf_input("other", "")).await.unwrap();

        let image = permanent(&service, "chall.png").await;
        service
            .create_challenge(challenge_input(&ctf.id, Some(&image)))
            .await
            .unwrap();
        let kept = service
            .create_challenge(challenge_input(&other.id, None))
            .await
            .unwrap();

        service.delete_ctf(&ctf.id).await.unwrap();

        assert!(matches!(
            service.get_ctf(&ctf.id).await,
            Err(SiteError::NotFound(_))
        ));
        let remaining = service
            .list_challenges(&ChallengeFilter::default())
            .await
            .unwrap();
        assert_eq!(remaining, vec![kept]);
        assert!(!service.uploads().permanent_exists("banner.png").await);
        assert!(!service.uploads().permanent_exists("chall.png").await);
    }

    #[tokio::test]
    async fn test_create_challenge_requires_existing_ctf() {
        let (_dir, service) = setup();
        let result = service
            .create_challenge(challenge_input("no-such-ctf", None))
            .await;
        assert!(matches!(result, Err(SiteError::Validation(_))));
    }

    #[tokio::test]
    async fn test_challenge_image_lifecycle() {
        let (_dir, service) = setup();
        let ctf = service.create_ctf(ctf_input("event", "")).await.unwrap();

        let url = staged(&service, "temp_4.jpg").await;
        let challenge = service
            .create_challenge(challenge_input(&ctf.id, Some(&url)))
            .await
            .unwrap();
        assert_eq!(challenge.image_url.as_deref(), Some("/uploads/4.jpg"));

        let cleared = service
            .update_challenge(&challenge.id, challenge_input(&ctf.id, Some("")))
            .await
            .unwrap();
        assert_eq!(cleared.image_url, None);
        assert!(!service.uploads().permanent_exists("4.jpg").await);
    }

    #[tokio::test]
    async fn test_delete_challenge_deletes_image() {
        let (_dir, service) = setup();
        let ctf = service.create_ctf(ctf_input("event", "")).await.unwrap();
        let image = permanent(&service, "c.png").await;
        let challenge = service
            .create_challenge(challenge_input(&ctf.id, Some(&image)))
            .await
            .unwrap();

        service.delete_challenge(&challenge.id).await.unwrap();

        assert!(!service.uploads().permanent_exists("c.png").await);
        assert!(matches!(
            service.delete_challenge(&challenge.id).await,
            Err(SiteError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cleanup_orphaned_challenges() {
        let (_dir, service) = setup();
        let ctf = service.create_ctf(ctf_input("event", "")).await.unwrap();
        service
            .create_challenge(challenge_input(&ctf.id, None))
            .await
            .unwrap();

        let now = Utc::now();
        service
            .challenge_repository()
            .insert(Challenge {
                id: new_id(),
                ctf_id: "gone".to_string(),
                title: "Orphan".to_string(),
                category: Category::Rev,
                description: "d".to_string(),
                writeup: "w".to_string(),
                image_url: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        assert_eq!(service.cleanup_orphaned_challenges().await.unwrap(), 1);
        assert_eq!(service.cleanup_orphaned_challenges().await.unwrap(), 0);
        assert_eq!(
            service
                .list_challenges(&ChallengeFilter::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_member_placeholder_avatar() {
        let (_dir, service) = setup();
        let member = service.create_member(member_input("")).await.unwrap();
        assert_eq!(member.avatar_url, PLACEHOLDER_AVATAR);
        assert_eq!(member.social, Social::default());
    }

    #[tokio::test]
    async fn test_member_avatar_replace_and_delete() {
        let (_dir, service) = setup();
        let first = staged(&service, "temp_5.png").await;
        let member = service.create_member(member_input(&first)).await.unwrap();
        assert_eq!(member.avatar_url, "/uploads/5.png");

        let second = staged(&service, "temp_6.png").await;
        let member = service
            .update_member(&member.id, member_input(&second))
            .await
            .unwrap();
        assert_eq!(member.avatar_url, "/uploads/6.png");
        assert!(!service.uploads().permanent_exists("5.png").await);

        service.delete_member(&member.id).await.unwrap();
        assert!(!service.uploads().permanent_exists("6.png").await);
        assert!(service.list_members().await.unwrap().is_empty());
    }

    #[test]
    fn test_validation_message() {
        let input = ctf_input("Bad Slug", "");
        let errors = input.validate().unwrap_err();
        assert_eq!(
            validation_message(&errors),
            "slug: Slug can only contain lowercase letters, numbers, and hyphens."
        );
    }
}
