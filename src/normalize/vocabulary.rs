//! 清洗用的词表：职位规则、学历规则、技能词表。
//!
//! 启动时构建一次，之后只读；解析函数通过引用拿到它。

use crate::normalize::education::EducationLevel;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// 一条职位规则：任一 pattern 是小写职位名的子串即命中
#[derive(Debug, Clone)]
pub struct PositionRule {
    pub patterns: Vec<String>,
    pub label: String,
}

impl PositionRule {
    pub fn new(patterns: &[&str], label: &str) -> Self {
        Self {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            label: label.to_string(),
        }
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.patterns.iter().any(|p| lowered.contains(p.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct EducationRule {
    pub key: String,
    pub level: EducationLevel,
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// 按声明顺序匹配，顺序即优先级
    pub position_rules: Vec<PositionRule>,
    pub education_rules: Vec<EducationRule>,
    /// 小写技能词，保持声明顺序
    pub skills: Vec<String>,
    skill_set: HashSet<String>,
}

// 全栈 必须排在 前端/后端 之前
const POSITION_RULES: &[(&[&str], &str)] = &[
    (&["java", "java开发", "java工程师", "java后端"], "Java开发工程师"),
    (&["python", "python开发", "python工程师", "python后端"], "Python开发工程师"),
    (&["全栈", "全栈工程师", "全栈开发"], "全栈开发工程师"),
    (&["前端", "web前端", "前端开发", "前端工程师", "h5开发"], "前端开发工程师"),
    (&["后端", "后台", "服务端", "服务器端", "后端开发"], "后端开发工程师"),
    (&["算法", "机器学习", "深度学习", "ai算法", "人工智能算法"], "算法工程师"),
    (&["数据分析", "数据挖掘", "大数据分析"], "数据分析师"),
    (&["测试", "qa", "测试工程师", "软件测试", "自动化测试"], "测试工程师"),
    (&["运维", "devops", "运维工程师", "系统运维"], "运维工程师"),
    (&["产品经理", "产品", "pm"], "产品经理"),
    (&["ui", "设计师", "ui设计", "交互设计"], "UI设计师"),
    (&["项目经理", "项目管理"], "项目经理"),
    (&["架构师", "系统架构师", "技术架构师"], "架构师"),
    (&["安全", "网络安全", "信息安全", "安全工程师"], "安全工程师"),
    (&["数据库", "dba", "数据库管理", "数据库工程师"], "数据库工程师"),
];

const EDUCATION_RULES: &[(&str, EducationLevel)] = &[
    ("博士", EducationLevel::Doctorate),
    ("硕士", EducationLevel::Master),
    ("研究生", EducationLevel::Master),
    ("本科", EducationLevel::Bachelor),
    ("大学本科", EducationLevel::Bachelor),
    ("学士", EducationLevel::Bachelor),
    ("大专", EducationLevel::Associate),
    ("专科", EducationLevel::Associate),
    ("高中", EducationLevel::HighSchool),
    ("中专", EducationLevel::Vocational),
    ("初中", EducationLevel::MiddleSchool),
    ("小学", EducationLevel::PrimarySchool),
    ("不限", EducationLevel::Unlimited),
    ("学历不限", EducationLevel::Unlimited),
];

const SKILLS: &[&str] = &[
    // 编程语言
    "python", "java", "c++", "javascript", "go", "rust", "php", "c#", "swift", "kotlin",
    // 前端
    "html", "css", "react", "vue", "angular", "jquery", "bootstrap", "webpack", "sass", "less",
    // 后端框架
    "django", "flask", "spring", "springboot", "express", "node.js", "laravel", "asp.net",
    // 数据库
    "mysql", "postgresql", "mongodb", "redis", "oracle", "sql server", "sqlite", "elasticsearch",
    // 大数据与 AI
    "hadoop", "spark", "hive", "tensorflow", "pytorch", "keras", "scikit-learn", "pandas", "numpy",
    // 云与 DevOps
    "docker", "kubernetes", "aws", "azure", "gcp", "jenkins", "git", "ci/cd", "linux", "unix",
    // 移动端
    "android", "ios", "flutter", "react native", "objective-c",
    // 其他
    "微服务", "分布式系统", "敏捷开发", "测试驱动", "设计模式", "restful", "graphql",
];

impl Vocabulary {
    pub fn new(
        position_rules: Vec<PositionRule>,
        education_rules: Vec<EducationRule>,
        skills: Vec<String>,
    ) -> Self {
        let mut seen = HashSet::new();
        let skills: Vec<String> = skills
            .into_iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        Self {
            position_rules,
            education_rules,
            skill_set: skills.iter().cloned().collect(),
            skills,
        }
    }

    pub fn builtin() -> Self {
        let position_rules = POSITION_RULES
            .iter()
            .map(|(patterns, label)| PositionRule::new(patterns, label))
            .collect();
        let education_rules = EDUCATION_RULES
            .iter()
            .map(|(key, level)| EducationRule {
                key: key.to_string(),
                level: *level,
            })
            .collect();
        let skills = SKILLS.iter().map(|s| s.to_string()).collect();
        Self::new(position_rules, education_rules, skills)
    }

    /// 进程内共享的内置词表
    pub fn shared() -> Arc<Vocabulary> {
        static SHARED: OnceLock<Arc<Vocabulary>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Vocabulary::builtin())).clone()
    }

    pub fn is_skill(&self, term: &str) -> bool {
        self.skill_set.contains(&term.to_lowercase())
    }

    pub fn canonical_position(&self, lowered: &str) -> Option<&str> {
        self.position_rules
            .iter()
            .find(|rule| rule.matches(lowered))
            .map(|rule| rule.label.as_str())
    }
}
