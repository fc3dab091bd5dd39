//! Chapter Navigation Tests
//!
//! Runs the view model against an in-memory chapter source and a recording
//! navigator.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::future::join;
use tokio::sync::oneshot;

use super::ChapterNavigation;
use crate::api::{ChapterSource, MockChapterSource};
use crate::config::MockLatency;
use crate::error::{ApiError, NavigationError};
use crate::ids::{Identifier, RouteParam};
use crate::models::{BranchChapter, Chapter, SortKey, SortOrder};
use crate::router::Navigator;

#[derive(Default)]
struct FakeSource {
    list_calls: AtomicUsize,
    content_calls: AtomicUsize,
    branch_calls: AtomicUsize,
    fail_list: AtomicBool,
    fail_content: AtomicBool,
    fail_branches: AtomicBool,
    /// Holds back the content of chapter 1 until released
    chapter_one_gate: Mutex<Option<oneshot::Receiver<()>>>,
    /// Holds back the chapter list of novel 1
    novel_one_list_gate: Mutex<Option<oneshot::Receiver<()>>>,
    /// Holds back the branches of chapter 1
    chapter_one_branch_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeSource {
    fn mock() -> MockChapterSource {
        MockChapterSource::new(MockLatency::none())
    }

    async fn pass(gate: &Mutex<Option<oneshot::Receiver<()>>>) {
        let gate = gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait(?Send)]
impl ChapterSource for FakeSource {
    async fn chapter_list(&self, novel_id: u32) -> Result<Vec<u32>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if novel_id == 1 {
            Self::pass(&self.novel_one_list_gate).await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ApiError::Request("offline".to_string()));
        }
        Self::mock().chapter_list(novel_id).await
    }

    async fn chapter_content(&self, novel_id: Identifier, chapter_id: u32) -> Result<Chapter, ApiError> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        if chapter_id == 1 {
            Self::pass(&self.chapter_one_gate).await;
        }
        if self.fail_content.load(Ordering::SeqCst) {
            return Err(ApiError::Request("timeout".to_string()));
        }
        Self::mock().chapter_content(novel_id, chapter_id).await
    }

    async fn branch_chapters(&self, novel_id: u32, chapter_id: u32) -> Result<Vec<BranchChapter>, ApiError> {
        self.branch_calls.fetch_add(1, Ordering::SeqCst);
        if chapter_id == 1 {
            Self::pass(&self.chapter_one_branch_gate).await;
        }
        if self.fail_branches.load(Ordering::SeqCst) {
            return Err(ApiError::NotFound(format!("chapter {}", chapter_id)));
        }
        Self::mock().branch_chapters(novel_id, chapter_id).await
    }
}

#[derive(Default)]
struct RecordingNavigator {
    pushes: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingNavigator {
    fn pushes(&self) -> Vec<String> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl Navigator for RecordingNavigator {
    async fn push(&self, path: &str) -> Result<(), NavigationError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NavigationError {
                path: path.to_string(),
                reason: "blocked".to_string(),
            });
        }
        self.pushes.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

fn setup(novel_id: i64, chapter_id: i64) -> (ChapterNavigation, Arc<FakeSource>, Arc<RecordingNavigator>) {
    let source = Arc::new(FakeSource::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let nav = ChapterNavigation::new(
        Identifier::new(novel_id),
        Identifier::new(chapter_id),
        source.clone(),
        navigator.clone(),
    );
    (nav, source, navigator)
}

fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

// ========================
// Chapter List
// ========================

#[tokio::test]
async fn test_invalid_novel_list_skips_round_trip() {
    let (nav, source, _) = setup(-1, 1);
    let list = nav.fetch_chapters_list(Identifier::INVALID).await;
    assert!(list.is_empty());
    assert!(nav.chapters().is_empty());
    assert_eq!(nav.error().as_deref(), Some("无效的小说ID，无法获取章节列表"));
    assert_eq!(calls(&source.list_calls), 0);
}

#[tokio::test]
async fn test_list_fetch_yields_ten_chapters_and_clears_error() {
    let (nav, _, _) = setup(5, 1);
    nav.fetch_chapters_list(Identifier::INVALID).await;
    assert!(nav.error().is_some());

    let list = nav.fetch_chapters_list(Identifier::new(5)).await;
    assert_eq!(list, (1..=10).collect::<Vec<u32>>());
    assert_eq!(nav.chapters(), list);
    assert!(nav.error().is_none());

    assert_eq!(nav.fetch_chapters_list(Identifier::new(5)).await, list);
}

#[tokio::test]
async fn test_list_failure_clears_list() {
    let (nav, source, _) = setup(5, 1);
    nav.fetch_chapters_list(Identifier::new(5)).await;
    source.fail_list.store(true, Ordering::SeqCst);

    assert!(nav.fetch_chapters_list(Identifier::new(5)).await.is_empty());
    assert!(nav.chapters().is_empty());
    assert_eq!(nav.error().as_deref(), Some("获取章节列表失败"));
}

#[tokio::test]
async fn test_stale_list_failure_is_discarded() {
    let (nav, source, _) = setup(5, 1);
    let (release, gate) = oneshot::channel();
    *source.novel_one_list_gate.lock().unwrap() = Some(gate);

    let slow = nav.fetch_chapters_list(Identifier::new(1));
    let fast = async {
        assert_eq!(nav.fetch_chapters_list(Identifier::new(2)).await.len(), 10);
        source.fail_list.store(true, Ordering::SeqCst);
        release.send(()).unwrap();
    };
    let (stale, _) = join(slow, fast).await;

    assert!(stale.is_empty());
    assert_eq!(nav.chapters().len(), 10);
    assert!(nav.error().is_none());
}

// ========================
// Chapter Content
// ========================

#[tokio::test]
async fn test_invalid_chapter_gives_sentinel() {
    let (nav, source, _) = setup(5, -1);
    nav.fetch_chapter_content(Identifier::INVALID).await;
    let chapter = nav.chapter();
    assert_eq!(chapter.id, Identifier::INVALID);
    assert_eq!(chapter.title, "错误");
    assert_eq!(chapter.content, vec!["无效的章节ID".to_string()]);
    assert_eq!(nav.error().as_deref(), Some("无效的章节ID"));
    assert_eq!(calls(&source.content_calls), 0);
    assert!(!nav.loading());
}

#[tokio::test]
async fn test_generic_content() {
    let (nav, _, _) = setup(5, 3);
    nav.fetch_chapter_content(Identifier::new(3)).await;
    let chapter = nav.chapter();
    assert_eq!(chapter.id, Identifier::new(3));
    assert_eq!(chapter.title, "第3章标题");
    assert_eq!(chapter.content.last().map(String::as_str), Some("小说ID: 5"));
    assert!(!nav.loading());
    assert!(nav.error().is_none());
}

#[tokio::test]
async fn test_reserved_novel_content_is_deterministic() {
    let (nav, _, _) = setup(999, 3);
    nav.fetch_chapter_content(Identifier::new(3)).await;
    let first = nav.chapter();
    nav.fetch_chapter_content(Identifier::new(3)).await;
    let second = nav.chapter();
    assert_eq!(first, second);
    assert_eq!(first.content.len(), 6);
    assert_ne!(first.title, "第3章标题");
}

#[tokio::test]
async fn test_content_failure_keeps_id() {
    let (nav, source, _) = setup(5, 3);
    nav.fetch_chapter_content(Identifier::new(3)).await;
    source.fail_content.store(true, Ordering::SeqCst);

    nav.fetch_chapter_content(Identifier::new(4)).await;
    let chapter = nav.chapter();
    assert_eq!(chapter.id, Identifier::new(3));
    assert_eq!(chapter.title, "加载失败");
    assert_eq!(chapter.content, vec!["获取内容失败，请重试".to_string()]);
    assert_eq!(nav.error().as_deref(), Some("获取章节内容失败"));
    assert!(!nav.loading());
}

#[tokio::test]
async fn test_stale_content_is_discarded() {
    let (nav, source, _) = setup(5, 1);
    let (release, gate) = oneshot::channel();
    *source.chapter_one_gate.lock().unwrap() = Some(gate);

    let slow = nav.fetch_chapter_content(Identifier::new(1));
    let fast = async {
        nav.fetch_chapter_content(Identifier::new(2)).await;
        assert!(!nav.loading());
        release.send(()).unwrap();
    };
    join(slow, fast).await;

    assert_eq!(nav.chapter().id, Identifier::new(2));
    assert!(!nav.loading());
    assert_eq!(calls(&source.content_calls), 2);
}

// ========================
// Derived Navigation
// ========================

#[tokio::test]
async fn test_prev_next_on_empty_list() {
    let (nav, _, _) = setup(5, 3);
    assert!(!nav.has_prev_chapter());
    assert!(!nav.has_next_chapter());
    assert_eq!(nav.current_chapter_index(), -1);
}

#[tokio::test]
async fn test_prev_next_across_the_list() {
    let (nav, _, _) = setup(5, 1);
    nav.initialize_chapter_data(Identifier::new(5), Identifier::new(1)).await;
    assert_eq!(nav.current_chapter_index(), 0);
    assert!(!nav.has_prev_chapter());
    assert!(nav.has_next_chapter());
    assert_eq!(nav.prev_chapter_id(), None);
    assert_eq!(nav.next_chapter_id(), Some(2));

    nav.on_chapter_param(RouteParam::Single("5")).await;
    assert_eq!(nav.prev_chapter_id(), Some(4));
    assert_eq!(nav.next_chapter_id(), Some(6));

    nav.on_chapter_param(RouteParam::Single("10")).await;
    assert!(nav.has_prev_chapter());
    assert!(!nav.has_next_chapter());
    assert_eq!(nav.next_chapter_id(), None);
}

#[tokio::test]
async fn test_unlisted_chapter_has_no_neighbours() {
    let (nav, _, _) = setup(5, 42);
    nav.initialize_chapter_data(Identifier::new(5), Identifier::new(42)).await;
    assert_eq!(nav.current_chapter_index(), -1);
    assert!(!nav.has_prev_chapter());
    assert!(!nav.has_next_chapter());
}

// ========================
// Transitions
// ========================

#[tokio::test]
async fn test_go_to_chapter() {
    let (nav, _, navigator) = setup(5, 3);
    nav.go_to_chapter(None).await;
    assert_eq!(nav.error().as_deref(), Some("无效的导航参数"));
    assert!(navigator.pushes().is_empty());

    nav.go_to_chapter(Some(4)).await;
    assert_eq!(navigator.pushes(), vec!["/novels/5/read/4".to_string()]);
}

#[tokio::test]
async fn test_go_to_chapter_without_novel() {
    let (nav, _, navigator) = setup(-1, 3);
    nav.go_to_chapter(Some(4)).await;
    assert_eq!(nav.error().as_deref(), Some("无效的导航参数"));
    assert!(navigator.pushes().is_empty());
}

#[tokio::test]
async fn test_navigation_failure_is_reported() {
    let (nav, _, navigator) = setup(5, 3);
    navigator.fail.store(true, Ordering::SeqCst);
    nav.go_to_chapter(Some(4)).await;
    assert_eq!(nav.error().as_deref(), Some("页面跳转失败"));
}

#[tokio::test]
async fn test_go_back() {
    let (nav, _, navigator) = setup(5, 3);
    nav.go_back().await;
    let (orphan, _, orphan_navigator) = setup(-1, 3);
    orphan.go_back().await;
    assert_eq!(navigator.pushes(), vec!["/novels/5".to_string()]);
    assert_eq!(orphan_navigator.pushes(), vec!["/".to_string()]);
}

// ========================
// Initialization
// ========================

#[tokio::test]
async fn test_initialize_rejects_invalid_ids() {
    let (nav, source, _) = setup(5, -1);
    nav.initialize_chapter_data(Identifier::new(5), Identifier::INVALID).await;
    assert_eq!(nav.error().as_deref(), Some("无效的小说或章节ID"));
    assert!(!nav.loading());
    assert_eq!(calls(&source.list_calls) + calls(&source.content_calls), 0);
}

#[tokio::test]
async fn test_initialize_loads_list_and_content() {
    let (nav, source, _) = setup(5, 3);
    nav.initialize_chapter_data(Identifier::new(5), Identifier::new(3)).await;
    assert_eq!(nav.chapters().len(), 10);
    assert_eq!(nav.chapter().id, Identifier::new(3));
    assert!(!nav.loading());
    assert!(nav.error().is_none());
    assert_eq!(calls(&source.list_calls), 1);
    assert_eq!(calls(&source.content_calls), 1);
}

#[tokio::test]
async fn test_initialize_surfaces_list_failure() {
    let (nav, source, _) = setup(5, 3);
    source.fail_list.store(true, Ordering::SeqCst);
    nav.initialize_chapter_data(Identifier::new(5), Identifier::new(3)).await;
    assert_eq!(nav.error().as_deref(), Some("获取章节列表失败"));
    assert!(!nav.loading());
}

#[tokio::test]
async fn test_open_discards_previous_visit() {
    let (nav, _, _) = setup(-1, -1);
    nav.open(Identifier::new(5), Identifier::new(3)).await;
    nav.toggle_branch_chapters().await;
    assert_eq!(nav.next_chapter_id(), Some(4));

    nav.open(Identifier::INVALID, Identifier::new(1)).await;
    assert_eq!(nav.novel_id(), Identifier::INVALID);
    assert!(nav.chapters().is_empty());
    assert_eq!(nav.next_chapter_id(), None);
    assert_eq!(nav.error().as_deref(), Some("无效的小说或章节ID"));
    assert_ne!(nav.chapter().title, "第3章标题");
    assert!(!nav.show_branch_chapters());
    assert!(nav.branch_chapters().is_empty());
    assert!(!nav.loading());
}

// ========================
// Route Reactor
// ========================

#[tokio::test]
async fn test_invalid_novel_param_resets_without_fetching() {
    let (nav, source, _) = setup(5, 3);
    nav.initialize_chapter_data(Identifier::new(5), Identifier::new(3)).await;
    let before = (calls(&source.list_calls), calls(&source.content_calls));

    nav.on_novel_param(RouteParam::Single("abc")).await;
    assert_eq!(nav.novel_id(), Identifier::INVALID);
    assert!(nav.chapters().is_empty());
    assert_eq!(nav.chapter(), Chapter::sentinel("无效的小说ID"));
    assert_eq!(nav.error().as_deref(), Some("无效的小说ID"));
    assert_eq!((calls(&source.list_calls), calls(&source.content_calls)), before);
}

#[tokio::test]
async fn test_novel_param_change_reinitializes() {
    let (nav, source, _) = setup(5, 3);
    nav.on_novel_param(RouteParam::Single("999")).await;
    assert_eq!(nav.novel_id(), Identifier::new(999));
    assert_eq!(nav.chapters().len(), 10);
    assert_eq!(nav.chapter().content.len(), 6);
    assert_eq!(calls(&source.list_calls), 1);
}

#[tokio::test]
async fn test_unchanged_params_do_not_refetch() {
    let (nav, source, _) = setup(5, 3);
    nav.on_novel_param(RouteParam::Single("5")).await;
    nav.on_chapter_param(RouteParam::Single("3")).await;
    assert_eq!(calls(&source.list_calls) + calls(&source.content_calls), 0);
}

#[tokio::test]
async fn test_chapter_param_change_fetches_content_only() {
    let (nav, source, _) = setup(5, 3);
    nav.initialize_chapter_data(Identifier::new(5), Identifier::new(3)).await;

    nav.on_chapter_param(RouteParam::Single("4")).await;
    assert_eq!(nav.chapter().id, Identifier::new(4));
    assert_eq!(calls(&source.list_calls), 1);
    assert_eq!(calls(&source.content_calls), 2);

    let many = vec!["4".to_string(), "5".to_string()];
    nav.on_chapter_param(RouteParam::Repeated(&many)).await;
    assert_eq!(nav.chapter_id(), Identifier::INVALID);
    assert_eq!(nav.chapter(), Chapter::sentinel("无效的章节ID"));
    assert_eq!(calls(&source.content_calls), 2);
}

#[tokio::test]
async fn test_valid_novel_without_chapter_waits() {
    let (nav, source, _) = setup(-1, -1);
    nav.on_novel_param(RouteParam::Single("5")).await;
    assert_eq!(nav.novel_id(), Identifier::new(5));
    assert_eq!(calls(&source.list_calls) + calls(&source.content_calls), 0);
    assert!(nav.error().is_none());
}

#[tokio::test]
async fn test_on_route_follows_reader_paths() {
    let (nav, _, _) = setup(-1, -1);
    nav.on_route("/novels/5/read/2").await;
    assert_eq!(nav.novel_id(), Identifier::new(5));
    assert_eq!(nav.chapter_id(), Identifier::new(2));
    assert_eq!(nav.chapter().title, "第2章标题");
    assert_eq!(nav.prev_chapter_id(), Some(1));

    nav.on_route("/login").await;
    assert_eq!(nav.chapter_id(), Identifier::new(2));
}

// ========================
// Branch Chapters
// ========================

#[tokio::test]
async fn test_branch_fetch_rejects_invalid_ids() {
    let (nav, source, _) = setup(5, 3);
    nav.fetch_branch_chapters(Identifier::new(5), Identifier::INVALID).await;
    assert!(nav.branch_chapters().is_empty());
    assert_eq!(nav.error().as_deref(), Some("无效的小说或章节ID，无法获取分支章节"));
    assert_eq!(calls(&source.branch_calls), 0);
}

#[tokio::test]
async fn test_branch_fetch_failure() {
    let (nav, source, _) = setup(5, 3);
    source.fail_branches.store(true, Ordering::SeqCst);
    nav.fetch_branch_chapters(Identifier::new(5), Identifier::new(3)).await;
    assert!(nav.branch_chapters().is_empty());
    assert_eq!(nav.error().as_deref(), Some("获取分支章节失败"));
    assert!(!nav.loading());
}

#[tokio::test]
async fn test_title_sort_and_reverse() {
    let (nav, _, _) = setup(5, 3);
    nav.fetch_branch_chapters(Identifier::new(5), Identifier::new(3)).await;
    assert_eq!(nav.branch_chapters().len(), 5);

    nav.set_sort_order(SortOrder::Asc);
    nav.set_sort_key(SortKey::Title);
    let ascending: Vec<String> = nav.branch_chapters().into_iter().map(|b| b.title).collect();
    assert!(ascending.windows(2).all(|pair| pair[0] <= pair[1]));

    nav.toggle_sort_order();
    assert_eq!(nav.sort_order(), SortOrder::Desc);
    let descending: Vec<String> = nav.branch_chapters().into_iter().map(|b| b.title).collect();
    let mut reversed = ascending.clone();
    reversed.reverse();
    assert_eq!(descending, reversed);
}

#[tokio::test]
async fn test_toggle_panel_fetches_only_when_opening() {
    let (nav, source, _) = setup(5, 3);
    nav.toggle_branch_chapters().await;
    assert!(nav.show_branch_chapters());
    assert_eq!(calls(&source.branch_calls), 1);

    // Default order is newest first.
    let times: Vec<i64> = nav.branch_chapters().iter().map(|b| b.created_at).collect();
    assert!(times.windows(2).all(|pair| pair[0] >= pair[1]));

    nav.toggle_branch_chapters().await;
    assert!(!nav.show_branch_chapters());
    assert_eq!(calls(&source.branch_calls), 1);
    assert!(!nav.loading());
}

#[tokio::test]
async fn test_on_route_switching_novel_initializes_once() {
    let (nav, source, _) = setup(5, 3);
    nav.initialize_chapter_data(Identifier::new(5), Identifier::new(3)).await;

    nav.on_route("/novels/999/read/4").await;
    assert_eq!(nav.chapter_id(), Identifier::new(4));
    assert_eq!(nav.chapter().content.len(), 6);
    assert_eq!(calls(&source.list_calls), 2);
    assert_eq!(calls(&source.content_calls), 2);

    nav.on_route("/novels/7/read/x").await;
    assert_eq!(nav.novel_id(), Identifier::new(7));
    assert_eq!(nav.chapter(), Chapter::sentinel("无效的章节ID"));
    assert_eq!(calls(&source.content_calls), 2);
}

fn branch_bases(nav: &ChapterNavigation) -> Vec<u64> {
    nav.branch_chapters().iter().map(|b| b.id / 100).collect()
}

#[tokio::test]
async fn test_open_panel_follows_chapter_change() {
    let (nav, source, _) = setup(5, 3);
    nav.initialize_chapter_data(Identifier::new(5), Identifier::new(3)).await;
    nav.toggle_branch_chapters().await;
    assert!(branch_bases(&nav).iter().all(|&base| base == 3));

    nav.on_chapter_param(RouteParam::Single("4")).await;
    assert_eq!(nav.branch_chapters().len(), 5);
    assert!(branch_bases(&nav).iter().all(|&base| base == 4));
    let times: Vec<i64> = nav.branch_chapters().iter().map(|b| b.created_at).collect();
    assert!(times.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(calls(&source.branch_calls), 2);

    nav.on_chapter_param(RouteParam::Single("x")).await;
    assert!(nav.branch_chapters().is_empty());
    assert_eq!(calls(&source.branch_calls), 2);
}

#[tokio::test]
async fn test_closed_panel_is_emptied_on_chapter_change() {
    let (nav, source, _) = setup(5, 3);
    nav.initialize_chapter_data(Identifier::new(5), Identifier::new(3)).await;
    nav.toggle_branch_chapters().await;
    nav.toggle_branch_chapters().await;
    assert_eq!(nav.branch_chapters().len(), 5);

    nav.on_chapter_param(RouteParam::Single("4")).await;
    assert!(nav.branch_chapters().is_empty());
    assert_eq!(calls(&source.branch_calls), 1);

    nav.toggle_branch_chapters().await;
    assert!(branch_bases(&nav).iter().all(|&base| base == 4));
}

#[tokio::test]
async fn test_stale_branches_are_discarded() {
    let (nav, source, _) = setup(5, 1);
    let (release, gate) = oneshot::channel();
    *source.chapter_one_branch_gate.lock().unwrap() = Some(gate);

    let slow = nav.fetch_branch_chapters(Identifier::new(5), Identifier::new(1));
    let fast = async {
        nav.fetch_branch_chapters(Identifier::new(5), Identifier::new(2)).await;
        release.send(()).unwrap();
    };
    join(slow, fast).await;

    assert_eq!(nav.branch_chapters().len(), 5);
    assert!(branch_bases(&nav).iter().all(|&base| base == 2));
    assert!(!nav.loading());
}
