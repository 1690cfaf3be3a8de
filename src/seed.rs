use crate::model::FaqQuestion;

// (category, question, answer, tags)
const SEED: &[(&str, &str, &str, &[&str])] = &[
    (
        "general",
        "What types of facilities do you clean?",
        "We clean offices, gyms, medical practices, retail stores, schools and managed properties.",
        &["facilities", "commercial"],
    ),
    (
        "general",
        "Are your cleaners employees or subcontractors?",
        "Every cleaner is a trained, background-checked employee of ours.",
        &["staff", "trust"],
    ),
    (
        "general",
        "Do you bring your own supplies and equipment?",
        "Yes. We bring [highlight]all supplies and equipment[/highlight], including HEPA vacuums.",
        &["supplies", "equipment"],
    ),
    (
        "general",
        "Are you insured and bonded?",
        "We carry general liability insurance and are fully bonded. Certificates are available on request.",
        &["insurance", "trust"],
    ),
    (
        "general",
        "Which areas do you serve?",
        "We serve the metro area and surrounding suburbs within a 40 mile radius.",
        &["coverage"],
    ),
    (
        "pricing",
        "How is pricing calculated?",
        "Pricing is based on square footage, cleaning frequency and any specialty services you select.",
        &["quote", "cost"],
    ),
    (
        "pricing",
        "Do you offer free estimates?",
        "Yes. Walkthroughs and written estimates are [highlight]always free[/highlight].",
        &["quote", "estimate"],
    ),
    (
        "pricing",
        "Are there discounts for recurring service?",
        "Weekly and bi-weekly contracts receive a reduced per-visit rate.",
        &["discount", "contract"],
    ),
    (
        "pricing",
        "Which payment methods do you accept?",
        "We accept ACH transfers, all major credit cards and company checks.",
        &["payment", "billing"],
    ),
    (
        "pricing",
        "Is there a cancellation fee?",
        "Cancellations with at least 24 hours notice are free of charge.",
        &["cancellation", "billing"],
    ),
    (
        "services",
        "What is included in a routine cleaning?",
        "Dusting, vacuuming, mopping, trash removal and restroom sanitation in every visit.",
        &["routine", "checklist"],
    ),
    (
        "services",
        "What is the difference between routine and deep cleaning?",
        "Deep cleaning adds baseboards, vents, inside appliances, grout scrubbing and detail work.",
        &["deep", "routine"],
    ),
    (
        "services",
        "Do you clean carpets and upholstery?",
        "Yes. Carpet extraction and upholstery cleaning are available as add-on services.",
        &["carpet", "extras"],
    ),
    (
        "services",
        "Do you offer move-in and move-out cleaning?",
        "We offer move-in and move-out cleaning for offices and rental properties.",
        &["moving", "property"],
    ),
    (
        "services",
        "Can you disinfect medical exam rooms?",
        "Our medical cleaning follows OSHA bloodborne pathogen guidelines and uses EPA-registered disinfectants.",
        &["medical", "disinfection"],
    ),
    (
        "scheduling",
        "Can you clean outside business hours?",
        "Yes. Most clients choose evening, overnight or weekend cleaning.",
        &["hours", "schedule"],
    ),
    (
        "scheduling",
        "How soon can you start?",
        "Most new clients are scheduled within one week of accepting an estimate.",
        &["onboarding"],
    ),
    (
        "scheduling",
        "Will the same team clean every time?",
        "We assign a dedicated team to each site so they learn your preferences.",
        &["team", "consistency"],
    ),
    (
        "scheduling",
        "How do I request a one-time extra cleaning?",
        "Contact your account manager or use the contact form and we will confirm a time.",
        &["extras", "schedule"],
    ),
    (
        "safety",
        "Are your products safe for children and pets?",
        "We default to green-certified products that are safe around children and pets.",
        &["eco", "products"],
    ),
    (
        "safety",
        "How do you secure our keys and alarm codes?",
        "Keys are coded and stored in a locked safe. Alarm codes are only shared with the assigned team.",
        &["security", "access"],
    ),
    (
        "safety",
        "What happens if something is damaged?",
        "Report it within 24 hours and we will repair or replace it under our insurance policy.",
        &["damage", "insurance"],
    ),
    (
        "safety",
        "Do your staff wear uniforms and ID badges?",
        "Yes. All staff wear branded uniforms and carry photo identification.",
        &["staff", "security"],
    ),
    (
        "safety",
        "Is there a satisfaction guarantee?",
        "If anything is missed, tell us within 24 hours and we will re-clean it at no charge.",
        &["guarantee", "quality"],
    ),
];

/// The catalogue used when the question bank is initialized empty.
pub fn seed_questions() -> Vec<FaqQuestion> {
    SEED.iter()
        .enumerate()
        .map(|(idx, (category, question, answer, tags))| FaqQuestion {
            id: format!("faq-{:04}", idx + 1),
            question: question.to_string(),
            answer: answer.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            order: idx as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::seed_questions;
    use std::collections::HashSet;

    #[test]
    fn seed_ids_are_unique() {
        let seed = seed_questions();
        let ids: HashSet<_> = seed.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), seed.len());
        assert!(seed.len() > 12);
    }
}
