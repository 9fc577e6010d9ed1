//! Built-in page copy

use marquee_core::backend::SectionCopy;

/// Hero copy used when no remote record is available
pub fn default_hero() -> SectionCopy {
    SectionCopy::new(
        "Websites that grow your business",
        "Design, build and marketing for teams that want results.",
        "Start your project",
    )
}

pub struct Service {
    pub name: &'static str,
    pub summary: &'static str,
}

pub const SERVICES: &[Service] = &[
    Service {
        name: "Web Design",
        summary: "Responsive sites built around your brand",
    },
    Service {
        name: "SEO",
        summary: "Be found by the customers already searching",
    },
    Service {
        name: "Branding",
        summary: "Identity systems that stay consistent",
    },
    Service {
        name: "Analytics",
        summary: "Dashboards that show what is working",
    },
];

pub struct Stat {
    pub label: &'static str,
    pub value: u64,
    pub suffix: &'static str,
}

pub const STATS: &[Stat] = &[
    Stat {
        label: "Projects delivered",
        value: 150,
        suffix: "+",
    },
    Stat {
        label: "Happy clients",
        value: 80,
        suffix: "+",
    },
    Stat {
        label: "Years in business",
        value: 12,
        suffix: "",
    },
    Stat {
        label: "Client satisfaction",
        value: 98,
        suffix: "%",
    },
];

pub struct Testimonial {
    pub quote: &'static str,
    pub author: &'static str,
    pub role: &'static str,
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        quote: "Our inbound leads doubled within three months of launch.",
        author: "Maria Chen",
        role: "Founder, Brightside Dental",
    },
    Testimonial {
        quote: "They understood what we needed before we did.",
        author: "James Okafor",
        role: "COO, Northwind Logistics",
    },
    Testimonial {
        quote: "Fast, thorough and genuinely pleasant to work with.",
        author: "Sofia Rossi",
        role: "Marketing Lead, Verde Studio",
    },
    Testimonial {
        quote: "The new site finally matches the quality of our work.",
        author: "Daniel Park",
        role: "Owner, Park & Sons Carpentry",
    },
];

pub const CONTACT_LINES: &[&str] = &[
    "Tell us about your project and we will reply within one business day.",
    "Run `marquee submit --help` to send a message from the terminal.",
];
