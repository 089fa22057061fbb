// All LLM prompt templates for the analysis module.
// Templates are filled with `str::replace`; the placeholders are
// `{system_prompt}`, `{cv_text}`, `{job_description}`, `{comparison}`,
// `{pronoun_instruction}` and `{json_only}`.

/// Guidance for reading a CV.
pub const CANDIDATE_SYSTEM: &str = "\
Let's think step by step.
CV details might be out of order or incomplete.
Analyze the CV concerning the candidate's experience and career. From this, derive logical \
conclusions about their technical skills, experience, and soft skills.
The format for educational qualifications should be: Degree - School/University/Organization - \
GPA - Year of Graduation. It's acceptable if some details are missing.
Experience should include experienced time and job name field of work based on projects and \
experiences.
Ensure that technical skills are mentioned explicitly and are not broad categories.
Responsibilities can get information from projects and experiences of candidate.
Set \"office\" to 1 if the candidate uses office suites (Word, Excel, PowerPoint), otherwise 0.
Set \"sql\" to 1 if the candidate uses SQL or a relational database, otherwise 0.";

/// CV extraction prompt. Replace `{system_prompt}`, `{pronoun_instruction}`,
/// `{json_only}` and `{cv_text}` before sending.
pub const CANDIDATE_PROMPT_TEMPLATE: &str = r#"{system_prompt}
{pronoun_instruction}

Please analyze the following CV and extract the information in JSON format.

Return a JSON object with the following structure:
{
    "candidate_name": "string",
    "phone_number": "string",
    "email": "string",
    "degree": ["array of strings"],
    "experience": ["array of strings"],
    "technical_skill": ["array of strings"],
    "responsibility": ["array of strings"],
    "certificate": ["array of strings"],
    "soft_skill": ["array of strings"],
    "comment": "string",
    "job_recommended": ["array of strings"],
    "office": 0,
    "sql": 0
}

{json_only}

CV Content:
{cv_text}"#;

/// Guidance for reading a job description.
pub const JOB_SYSTEM: &str = "\
Let's think step by step.
Respond using only the provided information and do not rely on your basic knowledge. The \
details given might be out of sequence or incomplete.
Experience should include required duration time and job name field of work.
Only use the given data to determine educational qualifications and certificates; do not make \
assumptions about these qualifications.
However, you are allowed to combine the provided details to draw logical conclusions about soft \
skills.";

/// Job extraction prompt. Replace `{system_prompt}`, `{json_only}` and
/// `{job_description}` before sending.
pub const JOB_PROMPT_TEMPLATE: &str = r#"{system_prompt}

Please analyze the following job description and extract the requirements in JSON format.

Return a JSON object with the following structure:
{
    "degree": ["array of educational requirements"],
    "experience": ["array of experience requirements"],
    "technical_skill": ["array of technical skills"],
    "responsibility": ["array of job responsibilities"],
    "certificate": ["array of required certificates"],
    "soft_skill": ["array of soft skills"]
}

{json_only}

Job Description:
{job_description}"#;

/// Scoring rubric for a candidate/job comparison.
pub const MATCHING_SYSTEM: &str = "\
Scoring Guide:
It's ok to say candidate does not match the requirement.
Degree Section: Prioritize major than degree level. Candidate with degrees more directly \
relevant to the required degree should receive higher score, even if their degree level is lower.
Experience Section: Candidate with more relevant experience field get higher score.
Technical Skills Section: Candidate with more relevant technical skills get higher score.
Responsibilities Section: Candidate with more relevant responsibilities get higher score.
Certificates Section: Candidate with required certificates get higher score. Candidate without \
required certificates get no score. Candidate with related certificates to the position get \
medium score.
Soft Skills Section: Prioritize foreign language and leadership skills. Candidate with more \
relevant soft skills get higher score.";

/// Matching prompt. Replace `{system_prompt}`, `{pronoun_instruction}`,
/// `{json_only}` and `{comparison}` before sending.
pub const MATCHING_PROMPT_TEMPLATE: &str = r#"{system_prompt}
{pronoun_instruction}

Please analyze the matching between candidate and job requirements:
{comparison}

Return a JSON object with detailed scoring and comments for each category.
Every score is an integer from 0 to 100:
{
    "degree": {"score": 0, "comment": "explanation"},
    "experience": {"score": 0, "comment": "explanation"},
    "technical_skill": {"score": 0, "comment": "explanation"},
    "responsibility": {"score": 0, "comment": "explanation"},
    "certificate": {"score": 0, "comment": "explanation"},
    "soft_skill": {"score": 0, "comment": "explanation"},
    "summary_comment": "overall assessment"
}

{json_only}"#;
