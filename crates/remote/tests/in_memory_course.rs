use alingo_core::model::{CourseId, Exercise, ExerciseId, SoundName};
use remote::{InMemoryCourse, PageRequest, Remote};

fn course() -> InMemoryCourse {
    let course_id = CourseId::new(1);
    (1..=5).fold(InMemoryCourse::new(), |course, id| {
        course.with_exercise(
            course_id,
            Exercise::new(ExerciseId::new(id), format!("L{id}"), format!("R{id}"), None),
            &format!("L{id}"),
        )
    })
}

#[tokio::test]
async fn pages_are_cut_with_requested_size() {
    let course = course();
    let remote = Remote::in_memory(course.clone());

    let first = remote.exercises.fetch_page(CourseId::new(1), 0, 2).await.unwrap();
    let last = remote.exercises.fetch_page(CourseId::new(1), 2, 2).await.unwrap();
    let beyond = remote.exercises.fetch_page(CourseId::new(1), 3, 2).await.unwrap();

    assert_eq!(first.exercises.len(), 2);
    assert_eq!(first.exercises[0].id(), ExerciseId::new(1));
    assert_eq!(last.exercises.len(), 1);
    assert_eq!(last.page, 2);
    assert!(beyond.is_empty());
    assert_eq!(first.total_size, Some(5));
    assert_eq!(
        course.fetch_log()[1],
        PageRequest {
            course: CourseId::new(1),
            page: 2,
            page_size: 2
        }
    );
}

#[tokio::test]
async fn verifier_judges_with_answer_key() {
    let course = course();
    let remote = Remote::in_memory(course.clone());

    let hit = remote.verifier.submit_guess(ExerciseId::new(2), "L2").await.unwrap();
    let miss = remote.verifier.submit_guess(ExerciseId::new(2), "R2").await.unwrap();

    assert!(hit.correct);
    assert!(!miss.correct);
    assert_eq!(miss.correct_answer, "L2");
    assert_eq!(course.submissions().len(), 2);
}

#[tokio::test]
async fn injected_failures_surface_messages() {
    let sound = SoundName::new("a.mp3").unwrap();
    let course = course().with_clip(sound.clone(), "audio/mpeg", vec![1, 2, 3]);
    let remote = Remote::in_memory(course.clone());

    let clip = remote.cues.resolve_cue(&sound).await.unwrap();
    assert_eq!(clip.bytes, vec![1, 2, 3]);

    course.fail_cues(true);
    course.fail_verifier(true);
    course.fail_pages_from(1);

    let cue_err = remote.cues.resolve_cue(&sound).await.unwrap_err();
    assert_eq!(cue_err.message(), "Sound service is down");
    assert!(remote.verifier.submit_guess(ExerciseId::new(1), "L1").await.is_err());
    assert!(remote.exercises.fetch_page(CourseId::new(1), 0, 2).await.is_ok());
    assert!(remote.exercises.fetch_page(CourseId::new(1), 1, 2).await.is_err());
}
