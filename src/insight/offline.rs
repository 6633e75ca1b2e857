//! 未配置大模型时使用的离线分析，只依据报告里的数字拼装固定话术。

use crate::analysis::AggregateReport;
use crate::insight::types::LlmAnalysis;

const FALLBACK_POSITIONS: [&str; 3] = ["开发工程师", "算法工程师", "测试工程师"];
const FALLBACK_SKILLS: [&str; 5] = ["Python", "Java", "JavaScript", "算法", "数据分析"];

fn top_keys(counts: Option<&crate::analysis::Ranked<usize>>, n: usize, fallback: &[&str]) -> Vec<String> {
    match counts {
        Some(c) if !c.is_empty() => c.keys().take(n).map(str::to_string).collect(),
        _ => fallback.iter().take(n).map(|s| s.to_string()).collect(),
    }
}

fn joined(items: &[String]) -> String {
    items.join(", ")
}

pub fn offline_analysis(report: &AggregateReport, timestamp: String) -> LlmAnalysis {
    let total_jobs = report.basic_stats.total_jobs;
    let avg_salary = match report.basic_stats.avg_salary {
        Some(v) => format!("{:.2}元/月", v),
        None => "暂无数据".to_string(),
    };
    let positions = top_keys(
        report.position_analysis.position_distribution.as_ref(),
        3,
        &FALLBACK_POSITIONS,
    );
    let skills = top_keys(report.skill_analysis.top_skills.as_ref(), 5, &FALLBACK_SKILLS);
    let head = |n: usize| joined(&skills[..n.min(skills.len())]);
    let tail = joined(&skills[2.min(skills.len())..]);

    let summary = format!(
        "当前计算机专业就业市场总体活跃，共有{}个职位空缺，平均薪资{}。从数据分析来看，{}等职位需求量较大，\
企业对人才的技能要求日益多元化，不仅注重专业技能，也越来越重视综合素质。技术发展日新月异，{}等技术持续热门，\
而{}等新兴技术也展现出强劲的发展势头。总体来看，计算机专业人才市场供需关系良好，但竞争也较为激烈，\
求职者需要不断提升自身技能以保持竞争力。",
        total_jobs,
        avg_salary,
        joined(&positions),
        head(2),
        tail
    );

    let insights = vec![
        format!(
            "{}等职位是当前市场需求最大的岗位，就业机会较多。",
            joined(&positions[..2.min(positions.len())])
        ),
        format!("平均薪资{}，高于全国平均工资水平，显示出计算机行业的薪资优势。", avg_salary),
        format!("{}是企业最看重的技能，掌握这些技能有助于提高就业竞争力。", head(2)),
        "一线城市的招聘需求量大，但竞争也更加激烈。".to_string(),
        "随着人工智能和大数据技术的发展，相关岗位需求呈上升趋势。".to_string(),
        "企业对复合型人才的需求增加，既懂技术又了解业务的人才更受欢迎。".to_string(),
        "远程工作和灵活办公模式正在计算机行业逐渐普及。".to_string(),
    ];

    let recommendations = vec![
        format!("重点学习{}等热门技术，提高核心竞争力。", head(3)),
        "积极参与开源项目和实践项目，积累实际工作经验。".to_string(),
        "关注行业动态，及时了解新技术发展趋势。".to_string(),
        "提升软技能，如沟通能力、团队协作能力和问题解决能力。".to_string(),
        "建立专业社交网络，参加行业交流活动和技术社区。".to_string(),
        "针对目标职位，有针对性地准备简历和面试。".to_string(),
        "考虑获取相关专业认证，增加就业竞争优势。".to_string(),
        "保持持续学习的习惯，适应技术快速迭代的特点。".to_string(),
    ];

    LlmAnalysis {
        summary,
        insights,
        recommendations,
        timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AggregationEngine;
    use crate::normalize::NormalizedBatch;

    #[test]
    fn empty_report_uses_fallback_terms() {
        let report = AggregationEngine::default().analyze(&NormalizedBatch::default());
        let a = offline_analysis(&report, "2024-01-01 00:00:00".to_string());
        assert!(a.summary.contains("共有0个职位空缺"));
        assert!(a.summary.contains("开发工程师, 算法工程师, 测试工程师"));
        assert!(a.summary.contains("暂无数据"));
        assert_eq!(a.insights.len(), 7);
        assert_eq!(a.recommendations.len(), 8);
        assert!(a.recommendations[0].contains("Python, Java, JavaScript"));
    }

    #[test]
    fn deterministic_for_same_report() {
        let report = AggregationEngine::default().analyze(&NormalizedBatch::default());
        let ts = "t".to_string();
        assert_eq!(
            offline_analysis(&report, ts.clone()),
            offline_analysis(&report, ts)
        );
    }
}
