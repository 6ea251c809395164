use std::collections::HashMap;

use catalog_logging::catalog_warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::client::CatalogApi;
use crate::{
    ApiError, FailureKind, ListQuery, PaginationInfo, Project, ProjectPage, SpreadsheetFile,
    UploadStats,
};

const OFFLINE_UPLOAD: &str = "Spreadsheet import needs the catalog server";

const GENERATED_PROJECTS: u64 = 10_000;
const SEED: u64 = 0x5eed_ca7a_109;

const PROJECT_TYPES: [&str; 10] = [
    "道路改建工程",
    "人行天桥新建工程",
    "公路升级工程",
    "桥梁维修工程",
    "隧道建设工程",
    "排水设施改造工程",
    "公交站台建设工程",
    "交通信号灯安装工程",
    "城市绿化工程",
    "管网改造工程",
];

const LOCATIONS: [&str; 19] = [
    "综合大道西延长线",
    "钟祥市安陆府路",
    "东湖高新区光谷大道",
    "武汉市江汉路",
    "荆州市沙市区",
    "十堰市茅箭区",
    "宜昌市夷陵区",
    "襄阳市樊城区",
    "黄石市下陆区",
    "鄂州市鄂城区",
    "孝感市孝南区",
    "黄冈市黄州区",
    "咸宁市咸安区",
    "随州市曾都区",
    "恩施市",
    "仙桃市",
    "潜江市",
    "天门市",
    "神农架林区",
];

/// Fixture groups whose tag yields exactly 1..=7 result pages at 20 rows a page:
/// (pages, first id, rows).
const FIXTURE_GROUPS: [(u32, u64, u64); 7] = [
    (1, 20_000, 15),
    (2, 21_000, 30),
    (3, 22_000, 50),
    (4, 23_000, 70),
    (5, 24_000, 90),
    (6, 25_000, 110),
    (7, 26_000, 130),
];

/// In-memory project dataset answering paginated keyword queries.
///
/// The owner decides the lifecycle: build it, query it, drop it.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

impl ProjectStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Demo dataset: generated infrastructure projects plus the `测试N页`
    /// fixture groups. Generation is seeded, so every call returns the same rows.
    pub fn seeded() -> Self {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut projects: Vec<Project> = (1..=GENERATED_PROJECTS)
            .map(|id| {
                let location = LOCATIONS[rng.random_range(0..LOCATIONS.len())];
                let kind = PROJECT_TYPES[rng.random_range(0..PROJECT_TYPES.len())];
                Project {
                    id,
                    name: format!("{location}{kind}"),
                }
            })
            .collect();

        for (pages, first_id, rows) in FIXTURE_GROUPS {
            projects.extend((1..=rows).map(|n| Project {
                id: first_id + n,
                name: format!("测试{pages}页 样例项目{n}号"),
            }));
        }

        Self { projects }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Answers one listing request.
    ///
    /// A non-empty `keyword` filters by case-insensitive substring of the name.
    /// `page` is clamped into `1..=max(total_pages, 1)` and `page_size` to at least 1.
    pub fn query(&self, page: u32, page_size: u32, keyword: &str) -> ProjectPage {
        let page_size = page_size.max(1);
        let needle = keyword.to_lowercase();
        let matches: Vec<&Project> = self
            .projects
            .iter()
            .filter(|project| needle.is_empty() || project.name.to_lowercase().contains(&needle))
            .collect();

        let total_count = matches.len() as u64;
        let total_pages = total_count.div_ceil(u64::from(page_size)) as u32;
        let page = page.clamp(1, total_pages.max(1));

        let start = (page as usize - 1) * page_size as usize;
        let data = matches
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();

        ProjectPage {
            data,
            pagination: PaginationInfo {
                page,
                page_size,
                total_count,
                total_pages,
            },
        }
    }

    /// Upsert used by the import handler once spreadsheet rows are parsed.
    /// Inserts new ids and renames existing ones; rows keep their first position.
    pub fn import(&mut self, records: Vec<Project>) -> UploadStats {
        let mut index: HashMap<u64, usize> = self
            .projects
            .iter()
            .enumerate()
            .map(|(position, project)| (project.id, position))
            .collect();

        let mut stats = UploadStats::default();
        for record in records {
            stats.total += 1;
            match index.get(&record.id) {
                Some(&position) => {
                    self.projects[position].name = record.name;
                    stats.updated += 1;
                }
                None => {
                    index.insert(record.id, self.projects.len());
                    self.projects.push(record);
                    stats.added += 1;
                }
            }
        }
        stats
    }
}

/// Serves listings from an owned [`ProjectStore`] in place of the HTTP API.
///
/// Spreadsheet parsing happens server-side, so uploads are refused.
#[derive(Debug, Clone)]
pub struct StoreCatalogApi {
    store: ProjectStore,
}

impl StoreCatalogApi {
    pub fn new(store: ProjectStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl CatalogApi for StoreCatalogApi {
    async fn list_projects(&self, query: &ListQuery) -> Result<ProjectPage, ApiError> {
        let keyword = query.keyword.as_deref().unwrap_or_default();
        Ok(self.store.query(query.page, query.page_size, keyword))
    }

    async fn upload_spreadsheet(&self, file: SpreadsheetFile) -> Result<UploadStats, ApiError> {
        catalog_warn!("Refusing offline upload of {}", file.file_name);
        Err(ApiError::new(FailureKind::InvalidRequest, OFFLINE_UPLOAD))
    }
}
