use shared::domain::Category;

pub const DEFAULT_ICON: &str = "img/icon/information.png";
pub const CORPORATE_BODY_ICON: &str = "img/icon/corporatebody.png";
pub const PERSON_ICON: &str = "img/icon/person.png";

pub fn icon_for(category: Category) -> &'static str {
    match category {
        Category::CorporateBody | Category::Government | Category::Organization => {
            CORPORATE_BODY_ICON
        }
        Category::Person => PERSON_ICON,
        Category::Other => DEFAULT_ICON,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterStyle {
    pub height: u32,
    pub url: String,
    pub width: u32,
}

/// Cluster badge images, smallest cluster first.
pub fn default_cluster_styles() -> Vec<ClusterStyle> {
    [53, 56, 66, 78, 90]
        .into_iter()
        .enumerate()
        .map(|(i, size)| ClusterStyle {
            height: size,
            url: format!("img/map/m{}.png", i + 1),
            width: size,
        })
        .collect()
}
