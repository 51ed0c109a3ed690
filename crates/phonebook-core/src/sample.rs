//! Sample contact generation.
//!
//! Produces plausible Russian-style contacts for demos and manual testing.
//! Phones are rendered in a mix of human formats and then run through
//! [`normalize_phone`], the same path user input takes.

use log::info;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::io;
use std::path::Path;

use crate::contact::Contact;
use crate::error::{Error, Result};
use crate::file::CsvFile;
use crate::phone::normalize_phone;
use crate::safe_io::atomic_write;

const MALE_FIRST_NAMES: &[&str] = &[
    "Александр", "Алексей", "Андрей", "Борис", "Вадим", "Виктор", "Дмитрий", "Евгений",
    "Иван", "Игорь", "Кирилл", "Максим", "Михаил", "Николай", "Олег", "Павел", "Роман",
    "Сергей", "Степан", "Юрий",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Алина", "Анна", "Валентина", "Вера", "Галина", "Дарья", "Екатерина", "Елена",
    "Ирина", "Ксения", "Людмила", "Мария", "Наталья", "Нина", "Ольга", "Полина",
    "Светлана", "Татьяна", "Юлия", "Яна",
];

/// Masculine surnames; the feminine form appends `а`.
const LAST_NAMES: &[&str] = &[
    "Иванов", "Смирнов", "Кузнецов", "Попов", "Васильев", "Петров", "Соколов", "Михайлов",
    "Новиков", "Федоров", "Морозов", "Волков", "Алексеев", "Лебедев", "Семенов", "Егоров",
    "Павлов", "Козлов", "Степанов", "Николаев", "Орлов", "Андреев", "Макаров", "Никитин",
    "Захаров", "Зайцев", "Соловьев", "Борисов", "Яковлев", "Григорьев",
];

/// Patronymics as (masculine, feminine) pairs.
const PATRONYMICS: &[(&str, &str)] = &[
    ("Александрович", "Александровна"),
    ("Алексеевич", "Алексеевна"),
    ("Андреевич", "Андреевна"),
    ("Борисович", "Борисовна"),
    ("Викторович", "Викторовна"),
    ("Дмитриевич", "Дмитриевна"),
    ("Евгеньевич", "Евгеньевна"),
    ("Иванович", "Ивановна"),
    ("Игоревич", "Игоревна"),
    ("Михайлович", "Михайловна"),
    ("Николаевич", "Николаевна"),
    ("Олегович", "Олеговна"),
    ("Павлович", "Павловна"),
    ("Сергеевич", "Сергеевна"),
    ("Юрьевич", "Юрьевна"),
];

const COMPANY_NAMES: &[&str] = &[
    "Альфа", "Вектор", "Гранит", "Дельта", "Заря", "Импульс", "Космос", "Лидер",
    "Меридиан", "Навигатор", "Орион", "Прогресс", "Ромашка", "Северсталь", "Сигма",
    "Технопарк", "Урал", "Феникс", "Энергия", "Янтарь",
];

/// Second half of a company name, joined with a hyphen (`Альфа-Строй`).
const COMPANY_KINDS: &[&str] = &[
    "Строй", "Торг", "Сервис", "Инвест", "Транс", "Групп", "Логистик", "Софт",
];

/// Operator codes used for generated numbers.
const PHONE_CODES: &[&str] = &[
    "495", "499", "812", "900", "903", "905", "916", "921", "926", "950", "977", "985",
];

/// Generate `count` distinct contacts.
pub fn generate<R: Rng>(count: usize, rng: &mut R) -> Vec<Contact> {
    let mut contacts: Vec<Contact> = Vec::with_capacity(count);
    while contacts.len() < count {
        let Some(contact) = random_contact(rng) else {
            continue;
        };
        if contacts.iter().any(|c| c.same_as(&contact)) {
            continue;
        }
        contacts.push(contact);
    }
    contacts
}

/// Write `contacts` to `path` as a fresh contact file.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_sample(path: &Path, contacts: &[Contact], force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists (use --force to overwrite)", path.display()),
        )));
    }
    let bytes = CsvFile::encode(contacts)?;
    atomic_write(path, &bytes)?;
    info!("wrote {} sample contacts to {}", contacts.len(), path.display());
    Ok(())
}

fn random_contact<R: Rng>(rng: &mut R) -> Option<Contact> {
    let female = rng.random_bool(0.5);
    let surname = *LAST_NAMES.choose(rng)?;
    let &(patronymic_m, patronymic_f) = PATRONYMICS.choose(rng)?;

    let (first_name, last_name, patronymic) = if female {
        (
            *FEMALE_FIRST_NAMES.choose(rng)?,
            format!("{}а", surname),
            patronymic_f,
        )
    } else {
        (
            *MALE_FIRST_NAMES.choose(rng)?,
            surname.to_string(),
            patronymic_m,
        )
    };

    let company = format!(
        "{}-{}",
        COMPANY_NAMES.choose(rng)?,
        COMPANY_KINDS.choose(rng)?
    );
    let work_phone = normalize_phone(&random_phone(rng)?).ok()?;
    let personal_phone = normalize_phone(&random_phone(rng)?).ok()?;

    Some(Contact::new(
        last_name,
        first_name,
        patronymic,
        company,
        work_phone,
        personal_phone,
    ))
}

/// A phone number in one of several human formats.
fn random_phone<R: Rng>(rng: &mut R) -> Option<String> {
    let code = *PHONE_CODES.choose(rng)?;
    let g1 = rng.random_range(0..1000);
    let g2 = rng.random_range(0..100);
    let g3 = rng.random_range(0..100);

    let phone = match rng.random_range(0..5) {
        0 => format!("+7 ({}) {:03}-{:02}-{:02}", code, g1, g2, g3),
        1 => format!("8 {} {:03} {:02} {:02}", code, g1, g2, g3),
        2 => format!("8-{}-{:03}-{:02}-{:02}", code, g1, g2, g3),
        3 => format!("+7{}{:03}{:02}{:02}", code, g1, g2, g3),
        _ => format!("{}{:03}{:02}{:02}", code, g1, g2, g3),
    };
    Some(phone)
}
