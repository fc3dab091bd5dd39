//! Synthetic Content
//!
//! Deterministic generators backing the mock source: full chapters for the
//! reserved demo novel, and the branch chapters of any base chapter.

use std::collections::BTreeSet;

use crate::models::{BranchChapter, Chapter};

/// Novel whose chapters are generated instead of served from the generic mock
pub const SYNTHETIC_NOVEL_ID: i64 = 999;

const PARAGRAPHS_PER_CHAPTER: usize = 6;
const BRANCHES_PER_CHAPTER: u32 = 5;

const TITLE_WORDS: [&str; 8] = ["雾港", "旧灯塔", "夜航", "潮汐", "北境来信", "星图", "钟楼", "渡口"];

const SETTINGS: [&str; 6] = [
    "港口的雾还没有散去",
    "钟楼敲过了第三下",
    "北风把窗纸吹得作响",
    "码头上只剩下一盏灯",
    "潮水退到了礁石后面",
    "远处传来了汽笛声",
];

const ACTIONS: [&str; 6] = [
    "她把信纸折好，塞进了外套的内袋",
    "老船长没有回头，只是抬手示意众人安静",
    "少年数着台阶往上走，每一步都很慢",
    "他们在地图上圈出了最后一个渡口",
    "有人敲了三下门，又停了很久",
    "灯芯忽然暗了下去，屋里的人都屏住了呼吸",
];

const BRANCH_TITLES: [&str; 5] = ["另一种结局", "如果那晚没有下雨", "旁观者视角", "十年之后", "未寄出的信"];

const BRANCH_AUTHORS: [&str; 5] = ["青岚", "墨白", "Kestrel", "夏至", "a_reader"];

const BRANCH_TAGS: [&str; 6] = ["番外", "平行世界", "同人", "短篇", "悬疑", "温情"];

/// 2024-01-01T00:00:00Z
const BRANCH_EPOCH_MS: i64 = 1_704_067_200_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// splitmix64 finalizer, enough to spread small ids over the tables
fn mix(novel_id: u32, chapter_id: u32) -> u64 {
    let mut z = (u64::from(novel_id) << 32 | u64::from(chapter_id)).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn pick<'a>(table: &[&'a str], seed: u64) -> &'a str {
    table[(seed % table.len() as u64) as usize]
}

/// Chapter of the reserved demo novel; same inputs always give the same text.
pub fn synthetic_chapter(novel_id: u32, chapter_id: u32) -> Chapter {
    let seed = mix(novel_id, chapter_id);
    let title = format!("第{}章 {}", chapter_id, pick(&TITLE_WORDS, seed));

    let content = (0..PARAGRAPHS_PER_CHAPTER)
        .map(|i| {
            let part = seed.rotate_left(i as u32 * 11);
            format!(
                "（{}-{}）{}，{}。",
                chapter_id,
                i + 1,
                pick(&SETTINGS, part),
                pick(&ACTIONS, part >> 16)
            )
        })
        .collect();

    Chapter {
        id: chapter_id.into(),
        title,
        content,
    }
}

/// The five branch chapters hanging off a base chapter.
///
/// Titles, authors and timestamps are pairwise distinct within one chapter.
pub fn synthetic_branch_chapters(chapter_id: u32) -> Vec<BranchChapter> {
    let base = u64::from(chapter_id);
    (1..=BRANCHES_PER_CHAPTER)
        .map(|i| {
            let slot = |stride: u64| ((base * stride + u64::from(i)) % BRANCH_TITLES.len() as u64) as usize;
            // (i * 3) % 5 is a permutation of 0..5
            let hour_offset = i64::from((i * 3) % BRANCHES_PER_CHAPTER);
            let tags: BTreeSet<String> = [
                BRANCH_TAGS[(slot(1) + 1) % BRANCH_TAGS.len()],
                BRANCH_TAGS[slot(3) % BRANCH_TAGS.len()],
            ]
            .into_iter()
            .map(str::to_string)
            .collect();

            BranchChapter {
                id: base * 100 + u64::from(i),
                title: format!("第{}章·{}", chapter_id, BRANCH_TITLES[slot(1)]),
                author: BRANCH_AUTHORS[slot(2)].to_string(),
                created_at: BRANCH_EPOCH_MS + i64::from(chapter_id) * DAY_MS + hour_offset * HOUR_MS,
                tags,
            }
        })
        .collect()
}
