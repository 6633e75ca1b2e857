use crate::analysis::{AggregateReport, Ranked};

pub const SYSTEM_PROMPT: &str = "你是一位专业的招聘数据分析师，擅长分析计算机专业的就业市场。";

pub struct PromptBuilder<'a> {
    report: &'a AggregateReport,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(report: &'a AggregateReport) -> Self {
        Self { report }
    }

    pub fn build(&self) -> String {
        let basic = &self.report.basic_stats;
        let salary = &self.report.salary_analysis;
        let mut lines = Vec::new();

        lines.push("请分析以下计算机专业招聘数据，并提供深度洞察和就业建议：".to_string());
        lines.push(String::new());
        lines.push("基本统计信息：".to_string());
        lines.push(format!("- 总职位数：{}", basic.total_jobs));
        lines.push(format!("- 平均薪资：{}", money(basic.avg_salary)));
        lines.push(format!("- 职位类型数：{}", basic.unique_positions));
        lines.push(format!("- 城市数量：{}", basic.unique_cities));
        lines.push(String::new());
        lines.push("薪资分析：".to_string());
        lines.push(format!("- 平均薪资：{}", money(salary.mean)));
        lines.push(format!("- 中位薪资：{}", money(salary.median)));
        lines.push(format!(
            "- 薪资范围：{} - {}",
            money(salary.min),
            money(salary.max)
        ));
        lines.push(String::new());

        let sections = [
            (
                "热门职位（前5）：",
                self.report.position_analysis.position_distribution.as_ref(),
                Some(5),
            ),
            (
                "热门技能（前10）：",
                self.report.skill_analysis.top_skills.as_ref(),
                Some(10),
            ),
            (
                "主要城市分布（前5）：",
                self.report.location_analysis.city_distribution.as_ref(),
                Some(5),
            ),
            (
                "经验要求分布：",
                self.report.experience_analysis.experience_distribution.as_ref(),
                None,
            ),
            (
                "学历要求分布：",
                self.report.education_analysis.education_distribution.as_ref(),
                None,
            ),
        ];
        for (title, counts, limit) in sections {
            lines.push(title.to_string());
            lines.push(format_counts(counts, limit));
            lines.push(String::new());
        }

        lines.push("请提供以下内容：".to_string());
        lines.push("1. 对当前计算机专业就业市场的总体分析（300字左右）".to_string());
        lines.push("2. 5-8条关键洞察".to_string());
        lines.push("3. 对计算机专业学生和求职者的5-8条就业建议".to_string());
        lines.push(String::new());
        lines.push(
            "请以JSON格式返回，包含summary（总体分析）、insights（关键洞察数组）和recommendations（就业建议数组）字段。"
                .to_string(),
        );
        lines.join("\n")
    }
}

fn money(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:.2}元/月", v),
        None => "无数据".to_string(),
    }
}

/// `- key: count` 列表，空分布输出"无数据"
pub fn format_counts(counts: Option<&Ranked<usize>>, limit: Option<usize>) -> String {
    let Some(counts) = counts.filter(|c| !c.is_empty()) else {
        return "无数据".to_string();
    };
    counts
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(k, v)| format!("- {}: {}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}
