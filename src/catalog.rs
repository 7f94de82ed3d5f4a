// 📚 Program Catalog - fixed tuition offerings
//
// The catalog is built once at startup and never mutated afterwards, so it is
// shared between request handlers behind a plain Arc with no lock.

use crate::models::{Program, ProgramType};

// ============================================================================
// PROGRAM CATALOG
// ============================================================================

/// Immutable table of the five programs, in definition order
#[derive(Debug, Clone)]
pub struct ProgramCatalog {
    programs: Vec<Program>,
}

impl ProgramCatalog {
    /// Create the catalog with the default programs
    pub fn new() -> Self {
        let mut catalog = ProgramCatalog {
            programs: Vec::with_capacity(ProgramType::ALL.len()),
        };

        catalog.register_default_programs();
        catalog
    }

    fn register_default_programs(&mut self) {
        // 1. Little Learners (4-6)
        self.register(
            ProgramType::LittleLearners,
            "Little Learners Foundation",
            "Ages 4-6",
            "Foundation Excellence",
            (800, 2800),
            &[
                "Advanced Number & Letter Mastery",
                "Interactive Color & Shape Theory",
                "Foundation Logical Thinking",
                "Gamified Learning Adventures",
                "Expert Parent Coaching",
                "Premium Physical Workbooks",
                "Progress Analytics Dashboard",
            ],
        );

        // 2. Young Explorers (7-9)
        self.register(
            ProgramType::YoungExplorers,
            "Young Explorers Discovery",
            "Ages 7-9",
            "Discovery Excellence",
            (1200, 4200),
            &[
                "Advanced Mathematics & Statistics",
                "Virtual Science Laboratory",
                "Critical Reading & Analysis",
                "Intermediate Logical Thinking",
                "Digital Art & Design",
                "AI-Powered Progress Tracking",
                "Peer Learning Networks",
            ],
        );

        // 3. Smart Kids (10-12)
        self.register(
            ProgramType::SmartKids,
            "Smart Kids Mastery",
            "Ages 10-12",
            "Mastery Excellence",
            (1500, 5250),
            &[
                "Higher Mathematics & Calculus Prep",
                "Professional Coding Fundamentals",
                "Real-World STEM Projects",
                "Advanced Logical Reasoning",
                "Algorithmic Thinking Mastery",
                "Critical Problem-Solving",
                "Mentor-Guided Learning",
            ],
        );

        // 4. Tech Teens (13-15)
        self.register(
            ProgramType::TechTeens,
            "Tech Teens Professional",
            "Ages 13-15",
            "Professional Excellence",
            (2000, 7000),
            &[
                "Professional Programming Languages",
                "Full-Stack Web Development",
                "Mobile App Development",
                "Advanced Algorithmic Design",
                "Industry-Level Projects",
                "Tech Career Preparation",
                "1-on-1 Industry Mentorship",
            ],
        );

        // 5. Future Leaders (16-18)
        self.register(
            ProgramType::FutureLeaders,
            "Future Leaders Mastery",
            "Ages 16-18",
            "Leadership Excellence",
            (2500, 8750),
            &[
                "AI & Machine Learning Mastery",
                "Enterprise App Development",
                "Advanced Data Science",
                "Complex Algorithmic Systems",
                "Leadership & Entrepreneurship",
                "Global Career Preparation",
                "Executive Mentorship Program",
            ],
        );
    }

    fn register(
        &mut self,
        program_type: ProgramType,
        name: &str,
        age_range: &str,
        description: &str,
        (monthly_price, quarterly_price): (i64, i64),
        features: &[&str],
    ) {
        self.programs.push(Program {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            age_range: age_range.to_string(),
            description: description.to_string(),
            monthly_price,
            quarterly_price,
            features: features.iter().map(|f| f.to_string()).collect(),
            program_type,
        });
    }

    /// All programs in definition order
    pub fn all(&self) -> &[Program] {
        &self.programs
    }

    pub fn get(&self, program_type: ProgramType) -> Option<&Program> {
        self.programs.iter().find(|p| p.program_type == program_type)
    }

    /// Look up a program by its wire tag. Unknown tags are a miss, not an error.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Program> {
        tag.parse::<ProgramType>()
            .ok()
            .and_then(|program_type| self.get(program_type))
    }

    pub fn count(&self) -> usize {
        self.programs.len()
    }
}

impl Default for ProgramCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_five_distinct_programs() {
        let catalog = ProgramCatalog::new();

        assert_eq!(catalog.count(), 5);
        let tags: HashSet<ProgramType> = catalog.all().iter().map(|p| p.program_type).collect();
        assert_eq!(tags.len(), 5);
        let ids: HashSet<&str> = catalog.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_catalog_order_is_definition_order() {
        let catalog = ProgramCatalog::new();
        let order: Vec<ProgramType> = catalog.all().iter().map(|p| p.program_type).collect();

        assert_eq!(order, ProgramType::ALL.to_vec());
    }

    #[test]
    fn test_find_by_tag_for_every_program() {
        let catalog = ProgramCatalog::new();

        for program_type in ProgramType::ALL {
            let program = catalog.find_by_tag(program_type.as_str()).unwrap();
            assert_eq!(program.program_type, program_type);
        }
    }

    #[test]
    fn test_find_by_tag_unknown_is_none() {
        let catalog = ProgramCatalog::new();

        assert!(catalog.find_by_tag("unknown_program").is_none());
        assert!(catalog.find_by_tag("").is_none());
        assert!(catalog.find_by_tag("Smart_Kids").is_none());
    }

    #[test]
    fn test_smart_kids_pricing() {
        let catalog = ProgramCatalog::new();
        let smart_kids = catalog.get(ProgramType::SmartKids).unwrap();

        assert_eq!(smart_kids.name, "Smart Kids Mastery");
        assert_eq!(smart_kids.age_range, "Ages 10-12");
        assert_eq!(smart_kids.monthly_price, 1500);
        assert_eq!(smart_kids.quarterly_price, 5250);
        assert_eq!(smart_kids.features.len(), 7);
    }

    #[test]
    fn test_ids_are_stable_across_lookups() {
        let catalog = ProgramCatalog::new();
        let first = catalog.get(ProgramType::TechTeens).unwrap().id.clone();
        let second = catalog.find_by_tag("tech_teens").unwrap().id.clone();

        assert_eq!(first, second);
    }
}
