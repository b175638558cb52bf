// Prompt templates for the six chains.
// Placeholders are `{name}` and are filled by `chains::render`.

/// Extracts technical skills from a cleaned JD. Replace `{description}`.
pub const SKILLS_PROMPT: &str = "\
You are an expert in analyzing job descriptions. Extract the key technologies, tools, \
programming languages, frameworks, and skills mentioned in the following job description. \
Output them as a comma-separated list. Ignore soft skills and generic terms.

JOB DESCRIPTION:
{description}";

/// Generates interview questions for a comma-joined skill list. Replace `{skills}`.
pub const QA_PROMPT: &str = r#"Based on the extracted skills: {skills}, generate 2 interview questions with detailed answers for each skill.
Focus on practical applications and scenarios relevant to the skill.

Return a JSON array of objects with this EXACT shape:
[
  {
    "skill": "Python",
    "question": "What is a list comprehension?",
    "answer": "A concise way to build a list in one expression, replacing a for loop with append calls, e.g. [x**2 for x in range(5)]."
  }
]"#;

/// Sentinel returned by the experience chain when the resume has no work history.
pub const NO_EXPERIENCE_SENTINEL: &str = "No experience section found";

/// Pulls the professional experience section out of a resume. Replace `{resume_text}`.
pub const EXPERIENCE_PROMPT: &str = "\
You are an expert in parsing resumes. From the full resume text below, extract ONLY the \
professional experience section (work history, employment, job experiences). \
Ignore the summary, skills, education, and any other sections. \
Output the extracted text as a single string. \
If no experience section is found, output exactly: No experience section found

RESUME:
{resume_text}";

/// Extracts technical skills from experience text. Replace `{experience_text}`.
pub const RESUME_KEYWORDS_PROMPT: &str = "\
You are an expert in analyzing resume experience. Extract the key technologies, tools, \
programming languages, frameworks, and skills mentioned in the following professional \
experience text. Output them as a comma-separated list. Ignore soft skills and generic terms.

EXPERIENCE:
{experience_text}";

/// Summarises tenure, domain and job periods. Replace `{experience_text}`.
pub const DETAILS_PROMPT: &str = r#"From the professional experience text below, calculate the total years of experience,
infer the primary domain from the company names (e.g. tech, finance, healthcare),
and list the job periods as start/end pairs such as [["2015", "2020"], ["2021", "Present"]].

Return a JSON object with this EXACT shape:
{"total_years": 0, "domain": "string", "periods": [["start", "end"]]}

EXPERIENCE:
{experience_text}"#;

/// Suggests resume bullets for one missing skill.
/// Replace: {experience_text}, {domain}, {total_years}, {periods}, {missing_skill}
pub const SUGGESTIONS_PROMPT: &str = r#"Based on the resume experience context: {experience_text}
domain: {domain}, total years: {total_years}, and job periods: {periods},
suggest 2-3 bullet points to add to the resume that incorporate the missing skill '{missing_skill}'.
Keep them relevant to the resume's context and realistic for the candidate's experience.

Return a JSON array of strings, e.g. ["Led implementation of X", "Optimized Z using X"]"#;
