//! Built-in catalog of study programs offered for fit analysis.

use jobmatch_core::models::resume::Difficulty;
use jobmatch_core::models::StudyProgram;

struct ProgramSpec {
    id: &'static str,
    name: &'static str,
    difficulty: Difficulty,
    skills: &'static [&'static str],
}

const PROGRAMS: &[ProgramSpec] = &[
    ProgramSpec {
        id: "web-development",
        name: "Web Development",
        difficulty: Difficulty::Beginner,
        skills: &["HTML", "CSS", "JavaScript", "TypeScript", "React", "Node.js", "REST", "Git"],
    },
    ProgramSpec {
        id: "computer-science",
        name: "Computer Science",
        difficulty: Difficulty::Advanced,
        skills: &["Algorithms", "Data Structures", "C++", "Java", "Python", "SQL", "Linux", "Git"],
    },
    ProgramSpec {
        id: "data-science",
        name: "Data Science",
        difficulty: Difficulty::Intermediate,
        skills: &["Python", "SQL", "Statistics", "Pandas", "Machine Learning", "Data Visualization"],
    },
    ProgramSpec {
        id: "machine-learning",
        name: "Machine Learning & AI",
        difficulty: Difficulty::Advanced,
        skills: &["Python", "Machine Learning", "Deep Learning", "PyTorch", "Statistics", "Linear Algebra"],
    },
    ProgramSpec {
        id: "cloud-devops",
        name: "Cloud & DevOps Engineering",
        difficulty: Difficulty::Intermediate,
        skills: &["Linux", "Docker", "Kubernetes", "AWS", "Terraform", "CI/CD", "Bash"],
    },
    ProgramSpec {
        id: "cybersecurity",
        name: "Cybersecurity",
        difficulty: Difficulty::Advanced,
        skills: &["Networking", "Linux", "Cryptography", "Penetration Testing", "Python", "Security"],
    },
    ProgramSpec {
        id: "mobile-development",
        name: "Mobile App Development",
        difficulty: Difficulty::Intermediate,
        skills: &["Kotlin", "Swift", "Android", "iOS", "Flutter", "REST", "Git"],
    },
    ProgramSpec {
        id: "ux-design",
        name: "UX/UI Design",
        difficulty: Difficulty::Beginner,
        skills: &["Figma", "User Research", "Prototyping", "Wireframing", "Usability Testing"],
    },
    ProgramSpec {
        id: "business-informatics",
        name: "Business Informatics",
        difficulty: Difficulty::Intermediate,
        skills: &["SQL", "Excel", "Business Analysis", "Project Management", "ERP", "Agile"],
    },
];

pub fn study_programs() -> Vec<StudyProgram> {
    PROGRAMS.iter().map(to_program).collect()
}

/// Looks a program up by id, or by name ignoring case.
pub fn find_program(key: &str) -> Option<StudyProgram> {
    let key = key.trim();
    PROGRAMS
        .iter()
        .find(|p| p.id == key || p.name.eq_ignore_ascii_case(key))
        .map(to_program)
}

fn to_program(spec: &ProgramSpec) -> StudyProgram {
    StudyProgram {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        difficulty: spec.difficulty,
        skills: spec.skills.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_and_skills_present() {
        let programs = study_programs();
        let ids: HashSet<&str> = programs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), programs.len());
        assert!(programs.iter().all(|p| !p.skills.is_empty()));
    }

    #[test]
    fn test_find_program_by_id_or_name() {
        assert_eq!(find_program("data-science").unwrap().name, "Data Science");
        assert_eq!(find_program("data science").unwrap().id, "data-science");
        assert!(find_program("astrology").is_none());
    }
}
