//! Skyline 剪枝
//!
//! 在回表、interesting order、查询范围三个维度上两两比较候选索引，
//! 删除被其他索引支配的候选。剪枝只做一次前向遍历，已被剪掉的索引不再参与比较。

use crate::query::optimizer::annotator::CandidateIndex;

/// 两个索引的比较结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum CompareStat {
    /// 互不支配
    Uncomparable = -2,
    /// 右侧更优
    Right = -1,
    /// 相同
    Equal = 0,
    /// 左侧更优
    Left = 1,
}

impl CompareStat {
    /// 交换左右
    pub fn inverse(self) -> Self {
        match self {
            CompareStat::Right => CompareStat::Left,
            CompareStat::Left => CompareStat::Right,
            other => other,
        }
    }
}

/// 回表维度
///
/// 双方都没有查询范围和 interesting order 时：没有过滤条件则不回表者胜；
/// 否则不回表者在列数不多于对方时胜，反之不可比。
fn compare_index_back(left: &CandidateIndex, right: &CandidateIndex, filter_count: usize) -> CompareStat {
    if left.index_back == right.index_back {
        return CompareStat::Equal;
    }

    let (winner, loser, stat) = if !left.index_back {
        (left, right, CompareStat::Left)
    } else {
        (right, left, CompareStat::Right)
    };

    if !left.has_range_or_order() && !right.has_range_or_order() {
        if filter_count == 0 || winner.column_count <= loser.column_count {
            stat
        } else {
            CompareStat::Uncomparable
        }
    } else {
        stat
    }
}

fn compare_interesting_order(left: &CandidateIndex, right: &CandidateIndex) -> CompareStat {
    match (left.has_interesting_order, right.has_interesting_order) {
        (true, false) => CompareStat::Left,
        (false, true) => CompareStat::Right,
        _ => CompareStat::Equal,
    }
}

/// 查询范围维度：相同为 Equal，严格超集胜，否则不可比
fn compare_query_range(left: &CandidateIndex, right: &CandidateIndex) -> CompareStat {
    let left_range = &left.extract_range;
    let right_range = &right.extract_range;

    if left_range == right_range {
        return CompareStat::Equal;
    }

    let left_covers = right_range.iter().all(|c| left_range.contains(c));
    let right_covers = left_range.iter().all(|c| right_range.contains(c));

    match (left_covers, right_covers) {
        (true, false) => CompareStat::Left,
        (false, true) => CompareStat::Right,
        // 列集合相同但顺序不同
        (true, true) => CompareStat::Equal,
        (false, false) => CompareStat::Uncomparable,
    }
}

/// 比较两个候选索引
pub fn skyline_compare(left: &CandidateIndex, right: &CandidateIndex, filter_count: usize) -> CompareStat {
    let dimensions = [
        compare_index_back(left, right, filter_count),
        compare_interesting_order(left, right),
        compare_query_range(left, right),
    ];

    if dimensions.contains(&CompareStat::Uncomparable) {
        return CompareStat::Uncomparable;
    }

    let has_left = dimensions.contains(&CompareStat::Left);
    let has_right = dimensions.contains(&CompareStat::Right);

    match (has_left, has_right) {
        (true, false) => CompareStat::Left,
        (false, true) => CompareStat::Right,
        (false, false) => CompareStat::Equal,
        (true, true) => CompareStat::Uncomparable,
    }
}

/// Skyline 剪枝器
#[derive(Debug, Default, Clone, Copy)]
pub struct SkylinePruner;

impl SkylinePruner {
    pub fn new() -> Self {
        Self
    }

    /// 删除被支配的候选，保留剩余候选的原有顺序
    ///
    /// 比较结果为 Equal 时两者都保留
    pub fn prune(&self, candidates: Vec<CandidateIndex>, filter_count: usize) -> Vec<CandidateIndex> {
        let mut pruned = vec![false; candidates.len()];

        for i in 0..candidates.len() {
            if pruned[i] {
                continue;
            }
            for j in (i + 1)..candidates.len() {
                if pruned[j] {
                    continue;
                }
                match skyline_compare(&candidates[i], &candidates[j], filter_count) {
                    CompareStat::Left => {
                        log::debug!(
                            "Skyline 剪枝: {} 被 {} 支配",
                            candidates[j].name,
                            candidates[i].name
                        );
                        pruned[j] = true;
                    }
                    CompareStat::Right => {
                        log::debug!(
                            "Skyline 剪枝: {} 被 {} 支配",
                            candidates[i].name,
                            candidates[j].name
                        );
                        pruned[i] = true;
                        break;
                    }
                    _ => {}
                }
            }
        }

        candidates
            .into_iter()
            .zip(pruned)
            .filter_map(|(candidate, pruned)| (!pruned).then_some(candidate))
            .collect()
    }
}
