//! Built-in demo: a 400-residue protein with six features, two of which wrap
//! through the origin.

use crate::config::ViewerOptions;
use crate::model::Annotation;

pub const DEMO_SEQUENCE: &str = "MTAVFRVGLVRLVSRATQSPNLLQAQTNALPAAFQQRCSISGKTMRGGPRVPKAAPYPYKTKKYSVFNAIFDKTSKRFDENSKVICVEGPIAAGKSKFAKELAEELDMEYYPAVDLDLIYINSYGYDMRKLDPQLPPSCRSYDVRNFCLDPSHDLAAQFQIRMYMLRYSQYIDALQHVLSTGQGVVLERSPYSDFVFMEAMFRQGYLSRGARSVYNELRQNTIGELLKPHLVIYLDLPVDAVKKQIKARNVDYEVQSKVFSDAYLSDLEQLYKQQYLKDISTHAELLIYDWTAGGETEVVVEDIERIDFNQFEADIHNKKMLDWRFPLEAEWCEARIKYCHEKPDLMNYFNVPRFDVPELVRSADDGKVWRDVWFNAPGMKYRPGYNADMGDEGLLTKTKIGINQGI";

/// Demo features, in packing order.
pub fn demo_features() -> Vec<Annotation> {
    vec![
        Annotation::new(0, 19, 305, "voluptate").with_color("green"),
        Annotation::new(1, 143, 283, "non").with_color("red"),
        Annotation::new(2, 76, 238, "voluptate").with_color("blue"),
        Annotation::new(3, 355, 12, "sit"),
        Annotation::new(4, 125, 206, "et"),
        Annotation::new(5, 253, 136, "proident"),
    ]
}

/// Options for the demo viewer.
pub fn demo_options() -> ViewerOptions {
    ViewerOptions {
        target: "demo".to_string(),
        sequence: DEMO_SEQUENCE.to_string(),
        width: 715,
        height: 505,
        features: demo_features(),
        ..ViewerOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::CircularViewer;

    #[test]
    fn test_demo_builds() {
        let viewer = CircularViewer::new(demo_options()).unwrap();
        assert_eq!(viewer.sequence().len(), DEMO_SEQUENCE.len());
        assert_eq!(viewer.annotations().len(), 6);
        assert_eq!(viewer.tracks().len(), 5);
    }
}
