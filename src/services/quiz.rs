// 测验选题服务
// 从题目池中随机抽取一道未出过的题目

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::error::SelectionError;
use crate::models::Question;

/// 从题目池中均匀随机选出一道 id 不在 `previously_asked` 中的题目
///
/// 先过滤出可选子集再抽样，题目全部出过时立即返回 `Exhausted`，
/// 题目池为空时返回 `NoCandidates`。
pub fn select_question<'a, R>(
    pool: &'a [Question],
    previously_asked: &HashSet<i64>,
    rng: &mut R,
) -> Result<&'a Question, SelectionError>
where
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return Err(SelectionError::NoCandidates);
    }

    let eligible: Vec<&Question> = pool
        .iter()
        .filter(|q| !previously_asked.contains(&q.id))
        .collect();

    eligible
        .choose(rng)
        .copied()
        .ok_or(SelectionError::Exhausted)
}
