use std::fmt;
use std::sync::Arc;

use alingo_core::model::{CourseId, Exercise, ExercisePage};
use remote::ExerciseSource;
use tracing::{debug, info};

use crate::config::MAX_PAGE_SIZE;
use crate::error::DrillError;

/// Whether the buffer has an exercise under its cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    Ready,
    /// The source returned an empty page; the session has no more exercises.
    Exhausted,
}

/// The loaded batch of exercises and the cursor into it.
///
/// Pages are fetched lazily: the next page is requested only once the cursor
/// runs off the end of the current one.
pub struct SessionBuffer {
    source: Arc<dyn ExerciseSource>,
    page_size: u32,
    first_page: u32,
    course: Option<CourseId>,
    batch: Vec<Exercise>,
    page: u32,
    index: usize,
    exhausted: bool,
    pages_fetched: usize,
}

impl SessionBuffer {
    /// `page_size` is kept within `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(source: Arc<dyn ExerciseSource>, page_size: u32, first_page: u32) -> Self {
        Self {
            source,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            first_page,
            course: None,
            batch: Vec::new(),
            page: first_page,
            index: 0,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Reset the cursor and load the first page of `course`.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::SourceUnavailable` if the page cannot be fetched.
    pub async fn start(&mut self, course: CourseId) -> Result<BufferState, DrillError> {
        self.course = Some(course);
        self.batch.clear();
        self.page = self.first_page;
        self.index = 0;
        self.exhausted = false;
        self.pages_fetched = 0;
        info!(%course, page = self.first_page, "starting exercise buffer");
        self.load(self.first_page).await
    }

    /// The exercise under the cursor, or `None` before the first batch loads.
    #[must_use]
    pub fn current(&self) -> Option<&Exercise> {
        self.batch.get(self.index)
    }

    /// Move the cursor to the next exercise, fetching the next page when the
    /// current one is used up.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::NoCourse` before `start`, and
    /// `DrillError::SourceUnavailable` if the next page cannot be fetched.
    pub async fn advance(&mut self) -> Result<BufferState, DrillError> {
        if self.exhausted {
            return Ok(BufferState::Exhausted);
        }
        if self.course.is_none() {
            return Err(DrillError::NoCourse);
        }

        self.index += 1;
        if self.index < self.batch.len() {
            return Ok(BufferState::Ready);
        }

        let next = self.page.saturating_add(1);
        debug!(page = next, "batch exhausted, fetching next page");
        self.load(next).await
    }

    async fn load(&mut self, page: u32) -> Result<BufferState, DrillError> {
        let course = self.course.ok_or(DrillError::NoCourse)?;
        self.pages_fetched += 1;
        let fetched = self.source.fetch_page(course, page, self.page_size).await;
        match fetched {
            Ok(batch) => Ok(self.replace(batch)),
            Err(err) => {
                // Nothing valid under the cursor until the session restarts.
                self.batch.clear();
                self.index = 0;
                Err(DrillError::SourceUnavailable(err))
            }
        }
    }

    fn replace(&mut self, batch: ExercisePage) -> BufferState {
        self.page = batch.page;
        self.index = 0;
        self.batch = batch.exercises;
        if self.batch.is_empty() {
            info!(page = self.page, "exercise source exhausted");
            self.exhausted = true;
            BufferState::Exhausted
        } else {
            debug!(page = self.page, len = self.batch.len(), "loaded exercise batch");
            BufferState::Ready
        }
    }

    #[must_use]
    pub fn course(&self) -> Option<CourseId> {
        self.course
    }

    /// Page number of the loaded batch, as reported by the source.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of page requests issued since `start`, failed ones included.
    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl fmt::Debug for SessionBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuffer")
            .field("course", &self.course)
            .field("page", &self.page)
            .field("index", &self.index)
            .field("batch_len", &self.batch.len())
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use alingo_core::model::ExerciseId;
    use remote::InMemoryCourse;

    fn course_with(count: u64) -> InMemoryCourse {
        (1..=count).fold(InMemoryCourse::new(), |course, id| {
            course.with_exercise(
                CourseId::new(1),
                Exercise::new(ExerciseId::new(id), "x", "y", None),
                "x",
            )
        })
    }

    fn buffer(course: &InMemoryCourse, page_size: u32) -> SessionBuffer {
        SessionBuffer::new(Arc::new(course.clone()), page_size, 0)
    }

    #[tokio::test]
    async fn current_is_empty_before_start() {
        let course = course_with(1);
        let buffer = buffer(&course, 2);
        assert!(buffer.current().is_none());
    }

    #[tokio::test]
    async fn advance_before_start_is_rejected() {
        let course = course_with(1);
        let mut buffer = buffer(&course, 2);
        assert!(matches!(buffer.advance().await, Err(DrillError::NoCourse)));
        assert!(course.fetch_log().is_empty());
    }

    #[tokio::test]
    async fn advance_within_batch_does_not_fetch() {
        let course = course_with(3);
        let mut buffer = buffer(&course, 3);
        buffer.start(CourseId::new(1)).await.unwrap();

        assert_eq!(buffer.advance().await.unwrap(), BufferState::Ready);
        assert_eq!(buffer.current().unwrap().id(), ExerciseId::new(2));
        assert_eq!(course.fetch_log().len(), 1);
    }

    #[tokio::test]
    async fn advance_past_end_fetches_next_page_once() {
        let course = course_with(3);
        let mut buffer = buffer(&course, 2);
        buffer.start(CourseId::new(1)).await.unwrap();
        buffer.advance().await.unwrap();

        assert_eq!(buffer.advance().await.unwrap(), BufferState::Ready);

        let log = course.fetch_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].page, 1);
        assert_eq!(buffer.index(), 0);
        assert_eq!(buffer.page(), 1);
        assert_eq!(buffer.current().unwrap().id(), ExerciseId::new(3));
    }

    #[tokio::test]
    async fn empty_page_exhausts_without_further_fetches() {
        let course = course_with(2);
        let mut buffer = buffer(&course, 2);
        buffer.start(CourseId::new(1)).await.unwrap();
        buffer.advance().await.unwrap();

        assert_eq!(buffer.advance().await.unwrap(), BufferState::Exhausted);
        assert_eq!(buffer.advance().await.unwrap(), BufferState::Exhausted);
        assert_eq!(buffer.advance().await.unwrap(), BufferState::Exhausted);

        assert_eq!(course.fetch_log().len(), 2);
        assert!(buffer.current().is_none());
        assert!(buffer.is_exhausted());
    }

    #[tokio::test]
    async fn empty_course_is_exhausted_at_start() {
        let course = InMemoryCourse::new();
        let mut buffer = buffer(&course, 2);
        assert_eq!(
            buffer.start(CourseId::new(9)).await.unwrap(),
            BufferState::Exhausted
        );
    }

    #[tokio::test]
    async fn failed_fetch_surfaces_source_unavailable() {
        let course = course_with(2);
        course.fail_pages_from(1);
        let mut buffer = buffer(&course, 1);
        buffer.start(CourseId::new(1)).await.unwrap();

        let err = buffer.advance().await.unwrap_err();
        assert!(matches!(err, DrillError::SourceUnavailable(_)));
        assert_eq!(err.banner(), "Exercise service is down");
        assert!(buffer.current().is_none());
    }

    #[tokio::test]
    async fn start_resets_previous_session() {
        let course = course_with(3);
        let mut buffer = buffer(&course, 2);
        buffer.start(CourseId::new(1)).await.unwrap();
        buffer.advance().await.unwrap();
        buffer.advance().await.unwrap();
        assert_eq!(buffer.page(), 1);

        buffer.start(CourseId::new(1)).await.unwrap();
        assert_eq!(buffer.page(), 0);
        assert_eq!(buffer.index(), 0);
        assert_eq!(buffer.pages_fetched(), 1);
        assert_eq!(buffer.current().unwrap().id(), ExerciseId::new(1));
    }

    #[tokio::test]
    async fn oversized_page_requests_are_capped() {
        let course = course_with(30);
        let mut buffer = buffer(&course, 50);
        buffer.start(CourseId::new(1)).await.unwrap();

        assert_eq!(course.fetch_log()[0].page_size, MAX_PAGE_SIZE);
    }
}
