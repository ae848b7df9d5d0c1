//! 团队成员匹配
//!
//! 团队标识由若干姓氏片段以 `-` 连接而成，每个片段与本次导入的学生姓名做
//! 不区分大小写的子串匹配，取第一个命中者。

use crate::models::roster::entities::Person;

/// 匹配结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberMatch {
    /// 去重后的成员 ID，按片段顺序
    pub member_ids: Vec<i64>,
    /// 未命中的片段
    pub unmatched: Vec<String>,
}

impl MemberMatch {
    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}

pub struct TeamMemberMatcher {
    roster: Vec<(i64, String)>,
}

impl TeamMemberMatcher {
    /// `roster` 的顺序决定同名片段的命中优先级
    pub fn new(roster: &[Person]) -> Self {
        Self {
            roster: roster
                .iter()
                .map(|p| (p.id, p.name.to_lowercase()))
                .collect(),
        }
    }

    pub fn resolve(&self, token: &str) -> MemberMatch {
        let mut result = MemberMatch::default();

        for fragment in token.split('-').map(str::trim).filter(|f| !f.is_empty()) {
            let needle = fragment.to_lowercase();
            match self.roster.iter().find(|(_, name)| name.contains(&needle)) {
                Some((id, _)) => {
                    if !result.member_ids.contains(id) {
                        result.member_ids.push(*id);
                    }
                }
                None => result.unmatched.push(fragment.to_string()),
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn person(id: i64, name: &str) -> Person {
        Person {
            id,
            carnet_id: None,
            name: name.to_string(),
            email: None,
            role_id: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn roster() -> Vec<Person> {
        vec![person(10, "Ana Garcia Torres"), person(11, "Pedro Lopez Diaz")]
    }

    #[test]
    fn test_resolves_each_fragment() {
        let matcher = TeamMemberMatcher::new(&roster());
        let result = matcher.resolve("Garcia-Lopez");
        assert_eq!(result.member_ids, vec![10, 11]);
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_no_match() {
        let matcher = TeamMemberMatcher::new(&roster());
        let result = matcher.resolve("Martinez");
        assert!(result.is_empty());
        assert_eq!(result.unmatched, vec!["Martinez"]);
    }

    #[test]
    fn test_case_insensitive_and_trimmed() {
        let matcher = TeamMemberMatcher::new(&roster());
        let result = matcher.resolve(" garcia - LOPEZ -");
        assert_eq!(result.member_ids, vec![10, 11]);
    }

    #[test]
    fn test_first_match_wins_and_dedup() {
        let people = vec![person(1, "Luis Torres"), person(2, "Ana Garcia Torres")];
        let matcher = TeamMemberMatcher::new(&people);
        let result = matcher.resolve("Torres-Torres-Garcia");
        assert_eq!(result.member_ids, vec![1, 2]);
    }

    #[test]
    fn test_partial_match() {
        let matcher = TeamMemberMatcher::new(&roster());
        let result = matcher.resolve("Garcia-Nadie");
        assert_eq!(result.member_ids, vec![10]);
        assert_eq!(result.unmatched, vec!["Nadie"]);
    }
}
