//! Static course/resource texts served from the end-user menu and the
//! resources inline keyboard. Markdown, sent as-is.

pub const COURSE_LIST: &str = r#"📚 *IT sohasidagi bepul o‘quv manbalari:*

📘 *Kitoblar:*
- 'C# Dasturlash Asoslari' – PDF [uz/cyr]
- 'Python for Beginners' – https://python.swaroopch.com/
- 'You Don't Know JS' – https://github.com/getify/You-Dont-Know-JS

🌐 *Bepul o‘quv kurslar (saytlar):*
- https://w3schools.com (HTML, CSS, JS)
- https://freecodecamp.org
- https://coursera.org (ba'zilari bepul)
- https://sololearn.com (mobil ilova ham bor)

🎥 *YouTube kanallari:*
- `CodeAcademy UZ` – [https://youtube.com/@CodeAcademyUZ](https://youtube.com/@CodeAcademyUZ)
- `Najot Ta'lim` – [https://youtube.com/@najottalim](https://youtube.com/@najottalim)
- `FreeCodeCamp` – [https://youtube.com/c/Freecodecamp](https://youtube.com/c/Freecodecamp)

📱 *Mobil ilovalar:*
- SoloLearn
- Mimo
- Programming Hub

📩 *Kursga yozilish uchun /start → 📅 Kursga yozilish tugmasini bosing.*"#;

/// Resource text for a callback trigger; `None` for unknown data.
pub fn resource_text(key: &str) -> Option<&'static str> {
    let text = match key {
        "sites" => {
            "🌍 *Dasturlash saytlari:*\n- https://github.com\n- https://stackoverflow.com\n- https://w3schools.com\n- https://freecodecamp.org"
        }
        "courses" => {
            "🎓 *Bepul IT kurslar:*\n- https://sololearn.com\n- https://cs50.harvard.edu\n- https://udemy.com (ba'zilari bepul)\n- https://freecodecamp.org"
        }
        "youtube" => {
            "🎥 *YouTube’dagi o‘quv kanallar:*\n- ProgrammingHero\n- Amigoscode\n- Traversy Media\n- Najot Ta'lim\n- CodeAcademy UZ"
        }
        "apps" => {
            "📱 *Mobil ilovalar (IT o‘rganish uchun):*\n- Sololearn\n- Enki\n- Grasshopper\n- Mimo"
        }
        "books" => {
            "📘 *IT kitoblar:*\n- [Clean Code](https://github.com/JuanCrg90/Clean-Code-Notes)\n- [Eloquent JavaScript](https://eloquentjavascript.net)\n- [Python for Beginners](https://python.swaroopch.com/)\n- [Najot Ta'lim Kitoblar](https://t.me/najottalimkitoblar)"
        }
        "news" => {
            "📰 *IT yangiliklar:* \n- https://techcrunch.com\n- https://thenextweb.com\n- https://dev.to"
        }
        "cv" => {
            "📄 *CV yozish maslahatlari:*\n- [Canva CV](https://www.canva.com/resumes/)\n- [Zety CV Builder](https://zety.com/resume-builder)\n- [Rezi AI](https://www.rezi.ai)\n\n📌 Tavsiya: CV 1 sahifa, qisqa va to‘liq bo‘lishi kerak."
        }
        "jobs" => {
            "💼 *Ish topish saytlari:*\n- https://linkedin.com\n- https://glassdoor.com\n- https://hh.uz\n- https://joblar.uz"
        }
        _ => return None,
    };
    Some(text)
}
