// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use ministry_scheduler::domain::member::{HistoryEntry, Member, MemberId};
use ministry_scheduler::domain::program::ProgramPart;
use ministry_scheduler::domain::types::{Gender, GenderRestriction, PartType, Role};

/// 测试统一使用的周起始日（周一）
pub fn test_week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// Member 构建器
// ==========================================

pub struct MemberBuilder {
    id: u64,
    name: String,
    gender: Gender,
    role: Role,
    baptized: Option<bool>,
    active: bool,
    family_group_id: Option<String>,
    age: Option<u32>,
    qualifications: Option<Vec<PartType>>,
    history: Vec<HistoryEntry>,
}

impl MemberBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: format!("Member {}", id),
            gender: Gender::Male,
            role: Role::BaptizedPublisher,
            baptized: None,
            active: true,
            family_group_id: None,
            age: None,
            qualifications: None,
            history: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn male(mut self) -> Self {
        self.gender = Gender::Male;
        self
    }

    pub fn female(mut self) -> Self {
        self.gender = Gender::Female;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// 未显式设置时,受浸传道员及以上视为已受浸
    pub fn baptized(mut self, baptized: bool) -> Self {
        self.baptized = Some(baptized);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn family(mut self, group: &str) -> Self {
        self.family_group_id = Some(group.to_string());
        self
    }

    pub fn age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn qualified_for(mut self, part_types: &[PartType]) -> Self {
        self.qualifications = Some(part_types.to_vec());
        self
    }

    /// 追加一条主讲历史
    pub fn performed(mut self, part_type: PartType, on: NaiveDate) -> Self {
        self.history.push(HistoryEntry {
            part_type,
            date: on,
            partner_id: None,
            as_helper: false,
        });
        self
    }

    /// 追加一条搭档历史
    pub fn paired_with(mut self, partner: u64, part_type: PartType, on: NaiveDate, as_helper: bool) -> Self {
        self.history.push(HistoryEntry {
            part_type,
            date: on,
            partner_id: Some(MemberId(partner)),
            as_helper,
        });
        self
    }

    pub fn build(self) -> Member {
        Member {
            id: MemberId(self.id),
            name: self.name,
            gender: self.gender,
            role: self.role,
            baptized: self
                .baptized
                .unwrap_or_else(|| self.role.is_baptized_publisher_or_higher()),
            active: self.active,
            family_group_id: self.family_group_id,
            age: self.age,
            qualifications: self.qualifications.map(|q| q.into_iter().collect()),
            history: self.history,
        }
    }
}

// ==========================================
// ProgramPart 构建器
// ==========================================

pub struct PartBuilder {
    sequence: u32,
    title: String,
    type_tag: String,
    duration_minutes: u32,
    requires_helper: bool,
    gender_restriction: GenderRestriction,
    scene: Option<String>,
}

impl PartBuilder {
    pub fn new(sequence: u32, type_tag: &str) -> Self {
        Self {
            sequence,
            title: type_tag.to_string(),
            type_tag: type_tag.to_string(),
            duration_minutes: 4,
            requires_helper: false,
            gender_restriction: GenderRestriction::None,
            scene: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_helper(mut self) -> Self {
        self.requires_helper = true;
        self
    }

    pub fn male_only(mut self) -> Self {
        self.gender_restriction = GenderRestriction::MaleOnly;
        self
    }

    pub fn scene(mut self, scene: &str) -> Self {
        self.scene = Some(scene.to_string());
        self
    }

    pub fn build(self) -> ProgramPart {
        ProgramPart {
            sequence: self.sequence,
            title: self.title,
            type_tag: self.type_tag,
            duration_minutes: self.duration_minutes,
            requires_helper: self.requires_helper,
            gender_restriction: self.gender_restriction,
            scene: self.scene,
        }
    }
}

// ==========================================
// 常用场景
// ==========================================

/// 一周完整节目单（与常见周中聚会结构一致）
pub fn full_week_program() -> Vec<ProgramPart> {
    vec![
        PartBuilder::new(1, "presidente").title("Comentários iniciais").male_only().duration(1).build(),
        PartBuilder::new(2, "oracao_abertura").title("Oração inicial").male_only().duration(1).build(),
        PartBuilder::new(3, "tesouros_palavra").title("Tesouros da Palavra").male_only().duration(10).build(),
        PartBuilder::new(4, "joias_espirituais").title("Joias espirituais").male_only().duration(10).build(),
        PartBuilder::new(5, "leitura_biblica").title("Leitura da Bíblia").male_only().build(),
        PartBuilder::new(6, "primeira_conversa").title("Iniciando conversas").with_helper().duration(3).scene("De casa em casa").build(),
        PartBuilder::new(7, "revisita").title("Cultivando o interesse").with_helper().scene("Testemunho informal").build(),
        PartBuilder::new(8, "discurso").title("Discurso").male_only().duration(5).build(),
        PartBuilder::new(9, "vida_crista").title("Nossa vida cristã").male_only().duration(15).build(),
        PartBuilder::new(10, "estudo_biblico_congregacao").title("Estudo bíblico de congregação").male_only().duration(30).build(),
        PartBuilder::new(11, "oracao_encerramento").title("Oração final").male_only().duration(1).build(),
    ]
}

/// 规模适中的会众: 4 名长老、3 名助理仆人、3 名受浸弟兄、6 名姐妹（含一个家庭）、2 名新学生
pub fn congregation() -> Vec<Member> {
    vec![
        MemberBuilder::new(1).name("Carlos").role(Role::Elder).family("silva").build(),
        MemberBuilder::new(2).name("Paulo").role(Role::Elder).build(),
        MemberBuilder::new(3).name("André").role(Role::Elder).build(),
        MemberBuilder::new(4).name("Jorge").role(Role::Elder).build(),
        MemberBuilder::new(5).name("Marcos").role(Role::MinisterialServant).build(),
        MemberBuilder::new(6).name("Tiago").role(Role::MinisterialServant).build(),
        MemberBuilder::new(7).name("Lucas").role(Role::MinisterialServant).build(),
        MemberBuilder::new(8).name("Pedro").role(Role::BaptizedPublisher).build(),
        MemberBuilder::new(9).name("Felipe").role(Role::BaptizedPublisher).build(),
        MemberBuilder::new(10).name("Mateus").role(Role::BaptizedPublisher).build(),
        MemberBuilder::new(11).name("Ana").female().role(Role::RegularPioneer).family("silva").build(),
        MemberBuilder::new(12).name("Maria").female().role(Role::RegularPioneer).build(),
        MemberBuilder::new(13).name("Rute").female().role(Role::BaptizedPublisher).build(),
        MemberBuilder::new(14).name("Ester").female().role(Role::BaptizedPublisher).build(),
        MemberBuilder::new(15).name("Lídia").female().role(Role::UnbaptizedPublisher).build(),
        MemberBuilder::new(16).name("Débora").female().role(Role::NewStudent).age(15).family("silva").build(),
        MemberBuilder::new(17).name("João").role(Role::NewStudent).age(16).build(),
        MemberBuilder::new(18).name("Samuel").role(Role::UnbaptizedPublisher).build(),
    ]
}
